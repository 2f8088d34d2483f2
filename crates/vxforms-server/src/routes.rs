//! HTTP routes
//!
//! | route | reply |
//! |-------|-------|
//! | `GET /forms` | every interpreted template |
//! | `GET /form/{name}` | one template plus `jobSpecIds` |
//! | `POST /submit/{name}` | url-encoded form collected into a document |
//! | `POST /commit-json` | upsert a JSON document |
//! | `GET /retrieve-json?id=` | one runtime document |
//! | `GET /list-ds-ids?type=` | runtime ids of a type |
//! | `GET /health` | liveness |

use serde::Serialize;
use serde_json::{json, Value as JsonValue};
use std::collections::HashMap;
use std::convert::Infallible;
use vxforms_core::{collect_form_fields, CatalogError, SubmissionError, VxForms, VxFormsError};
use vxforms_template::{FormTemplate, Lookup};
use warp::http::StatusCode;
use warp::reply::{json as reply_json, with_status, Json, WithStatus};
use warp::{Filter, Rejection, Reply};

type Response = WithStatus<Json>;

/// Every route, sharing one application context
pub fn routes(app: VxForms) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let health = warp::path!("health")
        .and(warp::get())
        .map(|| reply_json(&json!({"status": "ok", "version": crate::VERSION})));

    let forms = warp::path!("forms")
        .and(warp::get())
        .and(with_app(app.clone()))
        .and_then(list_forms);

    let form = warp::path!("form" / String)
        .and(warp::get())
        .and(with_app(app.clone()))
        .and_then(get_form);

    let submit = warp::path!("submit" / String)
        .and(warp::post())
        .and(warp::body::form::<Vec<(String, String)>>())
        .and_then(submit_form);

    let commit = warp::path!("commit-json")
        .and(warp::post())
        .and(warp::body::json::<JsonValue>())
        .and(with_app(app.clone()))
        .and_then(commit_json);

    let retrieve = warp::path!("retrieve-json")
        .and(warp::get())
        .and(warp::query::<HashMap<String, String>>())
        .and(with_app(app.clone()))
        .and_then(retrieve_json);

    let list = warp::path!("list-ds-ids")
        .and(warp::get())
        .and(warp::query::<HashMap<String, String>>())
        .and(with_app(app))
        .and_then(list_ids);

    health
        .or(forms)
        .or(form)
        .or(submit)
        .or(commit)
        .or(retrieve)
        .or(list)
        .with(warp::trace::request())
}

fn with_app(app: VxForms) -> impl Filter<Extract = (VxForms,), Error = Infallible> + Clone {
    warp::any().map(move || app.clone())
}

fn ok<T: Serialize>(body: &T) -> Response {
    with_status(reply_json(body), StatusCode::OK)
}

fn error(status: StatusCode, message: impl std::fmt::Display) -> Response {
    with_status(reply_json(&json!({"error": message.to_string()})), status)
}

/// Status for a failed operation
#[must_use]
pub fn status_of(err: &VxFormsError) -> StatusCode {
    match err {
        VxFormsError::Catalog(CatalogError::TemplateNotFound(_))
        | VxFormsError::Submission(SubmissionError::NotFound(_)) => StatusCode::NOT_FOUND,
        err if err.is_client_error() => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Reply for a failed operation
///
/// Client errors echo their message. Server errors are logged and replaced
/// by `public`.
fn failure(err: impl Into<VxFormsError>, public: &str) -> Response {
    let err = err.into();
    let status = status_of(&err);
    if status.is_server_error() {
        tracing::error!(error = %err, "{public}");
        error(status, public)
    } else {
        error(status, err)
    }
}

async fn list_forms(app: VxForms) -> Result<Response, Infallible> {
    Ok(match app.catalog().load().await {
        Ok(forms) => ok(&forms),
        Err(err) => failure(err, "Failed to load templates"),
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FormPage<'a> {
    form: &'a FormTemplate,
    job_spec_ids: Vec<String>,
}

async fn get_form(name: String, app: VxForms) -> Result<Response, Infallible> {
    let form = match app.catalog().find(&name).await {
        Ok(form) => form,
        Err(err) => return Ok(failure(err, "Failed to load template")),
    };

    // The form stays usable without job spec ids
    let job_spec_ids = match app.lookups().fetch(Lookup::JobSpecIds).await {
        Ok(ids) => ids.to_vec(),
        Err(err) => {
            tracing::warn!(error = %err, "job spec ids unavailable");
            Vec::new()
        }
    };

    Ok(ok(&FormPage {
        form: &form,
        job_spec_ids,
    }))
}

async fn submit_form(name: String, pairs: Vec<(String, String)>) -> Result<Response, Infallible> {
    let document = collect_form_fields(pairs);
    Ok(ok(&json!({"formType": name, "document": document})))
}

async fn commit_json(document: JsonValue, app: VxForms) -> Result<Response, Infallible> {
    Ok(match app.submission().commit(document).await {
        Ok(id) => ok(&json!({
            "id": id,
            "message": format!("Upserted form data with id: {id}"),
        })),
        Err(err) => failure(err, "Failed to upsert data to database"),
    })
}

async fn retrieve_json(
    query: HashMap<String, String>,
    app: VxForms,
) -> Result<Response, Infallible> {
    let Some(id) = query.get("id").filter(|id| !id.is_empty()) else {
        return Ok(error(StatusCode::BAD_REQUEST, "Missing id"));
    };
    Ok(match app.submission().retrieve(id).await {
        Ok(document) => ok(&document),
        Err(err) => failure(err, "Failed to retrieve document"),
    })
}

async fn list_ids(query: HashMap<String, String>, app: VxForms) -> Result<Response, Infallible> {
    let doc_type = query.get("type").map(String::as_str);
    Ok(match app.submission().list_ids(doc_type).await {
        Ok(ids) => ok(&ids),
        Err(err) => failure(err, "Failed to list ids"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use vxforms_store::StoreError;

    #[test]
    fn status_of_maps_error_kinds() {
        let cases: [(VxFormsError, StatusCode); 6] = [
            (CatalogError::TemplateNotFound("DS".into()).into(), StatusCode::NOT_FOUND),
            (SubmissionError::NotFound("DS:x".into()).into(), StatusCode::NOT_FOUND),
            (SubmissionError::invalid_id("contains '*'").into(), StatusCode::BAD_REQUEST),
            (SubmissionError::NotAnObject("array").into(), StatusCode::BAD_REQUEST),
            (SubmissionError::NoIds("NONE".into()).into(), StatusCode::INTERNAL_SERVER_ERROR),
            (
                CatalogError::Store(StoreError::Unavailable("down".into())).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(status_of(&err), status, "{err}");
        }
    }
}
