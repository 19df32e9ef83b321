mod test_utils;

use reqwest::StatusCode;
use serde_json::{json, Value};
use test_utils::*;

async fn match_ids(app: &TestApp, skill_ids: &[i64]) -> Vec<i64> {
    let response = app.post_json("/api/jobs/match", &json!({ "skillIds": skill_ids })).await;
    assert_eq!(response.status(), StatusCode::OK);

    let jobs: Vec<Value> = response.json().await.unwrap();
    jobs.iter().map(|job| job["id"].as_i64().unwrap()).collect()
}

#[actix_rt::test]
async fn go_and_sql_scenario() {
    let app = TestApp::spawn().await;
    let employer = app.create_employer("acme@x.com").await;
    let go = app.create_skill("Go").await;
    let sql = app.create_skill("SQL").await;
    assert_eq!((go, sql), (1, 2));

    let job = app.create_job(employer, &[go]).await;
    let job_id = job["id"].as_i64().unwrap();

    assert!(match_ids(&app, &[sql]).await.is_empty());
    assert_eq!(match_ids(&app, &[go, sql]).await, vec![job_id]);
}

#[actix_rt::test]
async fn empty_candidate_and_skill_less_jobs_never_match() {
    let app = TestApp::spawn().await;
    let employer = app.create_employer("acme@x.com").await;
    let go = app.create_skill("Go").await;

    app.create_job(employer, &[]).await;
    app.create_job(employer, &[go]).await;

    assert!(match_ids(&app, &[]).await.is_empty());

    for body in [json!({}), json!({ "skillIds": null })] {
        let response = app.post_json("/api/jobs/match", &body).await;
        assert_eq!(response.status(), StatusCode::OK);
        let jobs: Vec<Value> = response.json().await.unwrap();
        assert!(jobs.is_empty());
    }
    assert_eq!(match_ids(&app, &[go]).await.len(), 1);
}

#[actix_rt::test]
async fn preferred_skills_do_not_count_towards_a_match() {
    let app = TestApp::spawn().await;
    let employer = app.create_employer("acme@x.com").await;
    let go = app.create_skill("Go").await;
    let sql = app.create_skill("SQL").await;

    let mut body = job_body(employer, &[go]);
    body["preferredSkills"] = json!([{ "id": sql }]);
    let created = app.post_json("/api/jobs", &body).await;
    assert_eq!(created.status(), StatusCode::OK);

    assert!(match_ids(&app, &[sql]).await.is_empty());
}

#[actix_rt::test]
async fn inactive_jobs_are_excluded_and_results_are_ordered() {
    let app = TestApp::spawn().await;
    let employer = app.create_employer("acme@x.com").await;
    let go = app.create_skill("Go").await;

    let first = app.create_job(employer, &[go]).await;
    let second = app.create_job(employer, &[go]).await;
    let third = app.create_job(employer, &[go]).await;

    let mut inactive = job_body(employer, &[go]);
    inactive["active"] = json!(false);
    app.put_json(&format!("/api/jobs/{}", second["id"]), &inactive).await;

    assert_eq!(
        match_ids(&app, &[go, go]).await,
        vec![first["id"].as_i64().unwrap(), third["id"].as_i64().unwrap()]
    );
}
