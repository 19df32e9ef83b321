mod test_utils;

use reqwest::StatusCode;
use serde_json::{json, Value};
use test_utils::*;

#[actix_rt::test]
async fn created_job_reads_back_with_hydrated_skills() {
    let app = TestApp::spawn().await;
    let employer = app.create_employer("acme@x.com").await;
    let go = app.create_skill("Go").await;

    let job = app.create_job(employer, &[go, go]).await;
    assert_eq!(job["title"], "Backend engineer");
    assert_eq!(job["employerId"], employer);
    assert_eq!(job["active"], true);
    assert_eq!(job["requiredSkills"], json!([{ "id": go, "name": "Go", "category": null }]));
    assert_eq!(job["createdAt"], job["updatedAt"]);

    let fetched: Value = app
        .get(&format!("/api/jobs/{}", job["id"]))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(fetched, job);
}

#[actix_rt::test]
async fn unknown_references_are_rejected() {
    let app = TestApp::spawn().await;
    let employer = app.create_employer("acme@x.com").await;

    let unknown_skill = app.post_json("/api/jobs", &job_body(employer, &[99])).await;
    assert_eq!(unknown_skill.status(), StatusCode::BAD_REQUEST);

    let unknown_employer = app.post_json("/api/jobs", &job_body(employer + 100, &[])).await;
    assert_eq!(unknown_employer.status(), StatusCode::BAD_REQUEST);

    let all: Vec<Value> = app.get("/api/jobs").await.json().await.unwrap();
    assert!(all.is_empty());
}

#[actix_rt::test]
async fn missing_required_fields_are_reported() {
    let app = TestApp::spawn().await;

    let response = app.post_json("/api/jobs", &json!({ "title": "  " })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.unwrap();
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|d| d["field"].as_str())
        .collect();
    assert!(fields.contains(&"title"));
    assert!(fields.contains(&"description"));
    assert!(fields.contains(&"location"));
    assert!(fields.contains(&"employer_id"));
}

#[actix_rt::test]
async fn update_replaces_the_record_and_keeps_created_at() {
    let app = TestApp::spawn().await;
    let employer = app.create_employer("acme@x.com").await;
    let go = app.create_skill("Go").await;
    let sql = app.create_skill("SQL").await;
    let job = app.create_job(employer, &[go]).await;

    let mut replacement = job_body(employer, &[sql]);
    replacement["title"] = json!("Data engineer");
    let response = app.put_json(&format!("/api/jobs/{}", job["id"]), &replacement).await;
    assert_eq!(response.status(), StatusCode::OK);

    let updated: Value = response.json().await.unwrap();
    assert_eq!(updated["id"], job["id"]);
    assert_eq!(updated["title"], "Data engineer");
    assert_eq!(updated["requiredSkills"][0]["id"], sql);
    assert_eq!(updated["createdAt"], job["createdAt"]);

    let before = chrono::DateTime::parse_from_rfc3339(job["updatedAt"].as_str().unwrap()).unwrap();
    let after = chrono::DateTime::parse_from_rfc3339(updated["updatedAt"].as_str().unwrap()).unwrap();
    assert!(after >= before);
}

#[actix_rt::test]
async fn update_of_missing_job_is_not_found() {
    let app = TestApp::spawn().await;
    let employer = app.create_employer("acme@x.com").await;

    let response = app.put_json("/api/jobs/77", &job_body(employer, &[])).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn delete_is_idempotent() {
    let app = TestApp::spawn().await;
    let employer = app.create_employer("acme@x.com").await;
    let job = app.create_job(employer, &[]).await;
    let path = format!("/api/jobs/{}", job["id"]);

    let first = app.delete(&path).await;
    assert_eq!(first.status(), StatusCode::OK);
    assert!(first.text().await.unwrap().is_empty());

    assert_eq!(app.get(&path).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.delete(&path).await.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn employer_listing_only_shows_active_jobs() {
    let app = TestApp::spawn().await;
    let acme = app.create_employer("acme@x.com").await;
    let other = app.create_employer("other@x.com").await;

    let open = app.create_job(acme, &[]).await;
    let closed = app.create_job(acme, &[]).await;
    app.create_job(other, &[]).await;

    let mut inactive = job_body(acme, &[]);
    inactive["active"] = json!(false);
    app.put_json(&format!("/api/jobs/{}", closed["id"]), &inactive).await;

    let listed: Vec<Value> = app
        .get(&format!("/api/jobs/employer/{}", acme))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], open["id"]);
}

#[actix_rt::test]
async fn non_numeric_job_id_is_a_bad_request() {
    let app = TestApp::spawn().await;

    let response = app.get("/api/jobs/abc").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "bad_request");
}
