use jlearn_backend::store::DocumentId;
use jlearn_common::{DeleteResult, InsertResult, Lesson, UpdateResult, Vocabulary};
use reqwest::StatusCode;
use serde_json::{json, Value};

mod helpers;

#[tokio::test]
async fn test_lessons_crud_flow() {
    let (addr, client, _store) = helpers::spawn_app().await;
    let lessons_url = format!("http://{addr}/lessons");

    // 1. Initially, GET lessons should return an empty list
    let response = client.get(&lessons_url).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let lessons: Vec<Lesson> = response.json().await.unwrap();
    assert!(lessons.is_empty(), "Initially there should be no lessons.");

    // 2. CREATE a lesson with arbitrary fields
    let response = client
        .post(format!("http://{addr}/lesson"))
        .json(&json!({ "title": "Hiragana", "level": 1, "tags": ["kana"] }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let inserted: InsertResult = response.json().await.unwrap();
    assert!(inserted.acknowledged);
    let id = inserted.inserted_id;

    let lessons: Vec<Lesson> = client.get(&lessons_url).send().await.unwrap().json().await.unwrap();
    assert_eq!(lessons.len(), 1);
    assert_eq!(lessons[0].id.as_deref(), Some(id.as_str()));
    assert_eq!(lessons[0].fields["title"], "Hiragana");

    // 3. UPDATE merges fields instead of replacing the document
    let response = client
        .patch(format!("http://{addr}/lesson-update/{id}"))
        .json(&json!({ "level": 2 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated: UpdateResult = response.json().await.unwrap();
    assert_eq!(updated.matched_count, 1);
    assert_eq!(updated.modified_count, 1);
    assert_eq!(updated.upserted_count, 0);

    let lessons: Vec<Lesson> = client.get(&lessons_url).send().await.unwrap().json().await.unwrap();
    assert_eq!(lessons[0].fields["title"], "Hiragana");
    assert_eq!(lessons[0].fields["level"], 2);
    assert_eq!(lessons[0].fields["tags"], json!(["kana"]));

    // 4. DELETE the lesson, twice
    let delete_url = format!("http://{addr}/lesson-del/{id}");
    let deleted: DeleteResult = client.delete(&delete_url).send().await.unwrap().json().await.unwrap();
    assert_eq!(deleted.deleted_count, 1);
    let deleted: DeleteResult = client.delete(&delete_url).send().await.unwrap().json().await.unwrap();
    assert_eq!(deleted.deleted_count, 0);

    let lessons: Vec<Lesson> = client.get(&lessons_url).send().await.unwrap().json().await.unwrap();
    assert!(lessons.is_empty());
}

#[tokio::test]
async fn test_lesson_update_upserts_missing_document() {
    let (addr, client, _store) = helpers::spawn_app().await;
    let id = DocumentId::generate();

    let response = client
        .patch(format!("http://{addr}/lesson-update/{id}"))
        .json(&json!({ "title": "Created by update" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let result: UpdateResult = response.json().await.unwrap();
    assert_eq!(result.matched_count, 0);
    assert_eq!(result.upserted_count, 1);
    assert_eq!(result.upserted_id.as_deref(), Some(id.as_str()));

    let lessons: Vec<Lesson> = client
        .get(format!("http://{addr}/lessons"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(lessons.len(), 1);
    assert_eq!(lessons[0].id.as_deref(), Some(id.as_str()));
    assert_eq!(lessons[0].fields["title"], "Created by update");
}

#[tokio::test]
async fn test_lesson_update_failure_reports_detail() {
    let (addr, client, _store) = helpers::spawn_app().await;

    let response = client
        .patch(format!("http://{addr}/lesson-update/not-an-id"))
        .json(&json!({ "title": "x" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Failed to update lesson");
    assert!(body["error"].as_str().unwrap().contains("not-an-id"));
}

#[tokio::test]
async fn test_vocabulary_crud_flow() {
    let (addr, client, _store) = helpers::spawn_app().await;
    let list_url = format!("http://{addr}/vocabularies");

    let inserted: InsertResult = client
        .post(format!("http://{addr}/vocabulary"))
        .json(&json!({ "word": "inu", "reading": "いぬ" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = inserted.inserted_id;

    let response = client
        .patch(format!("http://{addr}/vocabulary-update/{id}"))
        .json(&json!({ "meaning": "dog" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated: UpdateResult = response.json().await.unwrap();
    assert_eq!((updated.matched_count, updated.modified_count), (1, 1));

    let words: Vec<Vocabulary> = client.get(&list_url).send().await.unwrap().json().await.unwrap();
    assert_eq!(words.len(), 1);
    assert_eq!(words[0].fields["reading"], "いぬ");
    assert_eq!(words[0].fields["meaning"], "dog");

    let deleted: DeleteResult = client
        .delete(format!("http://{addr}/vocabulary-del/{id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(deleted.deleted_count, 1);
}

#[tokio::test]
async fn test_updates_without_upsert_miss_quietly() {
    let (addr, client, _store) = helpers::spawn_app().await;
    let id = DocumentId::generate();

    // Vocabulary: no upsert
    let result: UpdateResult = client
        .patch(format!("http://{addr}/vocabulary-update/{id}"))
        .json(&json!({ "word": "neko" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(result.matched_count, 0);
    assert_eq!(result.upserted_count, 0);
    assert!(result.upserted_id.is_none());

    let words: Vec<Vocabulary> = client
        .get(format!("http://{addr}/vocabularies"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(words.is_empty());

    // User role: no upsert
    let result: UpdateResult = client
        .patch(format!("http://{addr}/user-role/{id}"))
        .json(&json!({ "role": "admin" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(result.matched_count, 0);
    assert_eq!(result.upserted_count, 0);

    let users: Vec<Value> = client
        .get(format!("http://{addr}/users"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(users.is_empty());
}

#[tokio::test]
async fn test_user_delete() {
    let (addr, client, _store) = helpers::spawn_app().await;
    let id = helpers::register_user(&addr, &client, "A", "a@x.com", "p1").await;

    let deleted: DeleteResult = client
        .delete(format!("http://{addr}/user-del/{id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(deleted.deleted_count, 1);

    // The email is free again
    helpers::register_user(&addr, &client, "A", "a@x.com", "p1").await;
}

#[tokio::test]
async fn test_malformed_ids_are_rejected() {
    let (addr, client, _store) = helpers::spawn_app().await;

    for url in [
        format!("http://{addr}/lesson-del/123"),
        format!("http://{addr}/user-del/xyz"),
        format!("http://{addr}/vocabulary-del/65a1b2c3d4e5f60718293a4"),
    ] {
        let response = client.delete(&url).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{url}");
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["message"], "Invalid id");
    }

    let response = client
        .patch(format!("http://{addr}/vocabulary-update/nope"))
        .json(&json!({ "word": "x" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
