use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use mockall::Sequence;
use prep_organizer_core::contract::{
    Identity, MockHostingApi, PublishError, PutFileBody, PutFileResponse, RemoteFile,
    RepositoryDescriptor, ShaRef,
};
use prep_organizer_core::encoding::decode_content;
use prep_organizer_core::problem::parse_problem_url;
use prep_organizer_core::publisher::{
    format_commit_message, format_commit_message_on, Probe, PublishKind, PublishRequest,
    RemotePublisher, CREDENTIAL_KEY,
};
use prep_organizer_core::store::{KeyValueStore, MemoryStore};

const TOKEN: &str = "ghp_test_token";

fn store_with_token() -> MemoryStore {
    let store = MemoryStore::new();
    store.set(CREDENTIAL_KEY, TOKEN).unwrap();
    store
}

fn request() -> PublishRequest {
    PublishRequest {
        repository: "octo/prep".to_string(),
        path: "solutions/TwoSum.py".to_string(),
        content: "def f():\n    return \"ünïcødé ✓\"\n".to_string(),
        message: "Add solution for Two Sum - 04/05".to_string(),
    }
}

fn put_response() -> PutFileResponse {
    PutFileResponse {
        content: Some(ShaRef {
            sha: "newblob".to_string(),
        }),
        commit: Some(ShaRef {
            sha: "c0ffee".to_string(),
        }),
    }
}

#[tokio::test]
async fn publish_creates_file_without_sha_when_probe_finds_nothing() {
    let mut api = MockHostingApi::new();
    let mut seq = Sequence::new();
    let captured: Arc<Mutex<Vec<PutFileBody>>> = Arc::new(Mutex::new(Vec::new()));

    api.expect_get_file()
        .withf(|token: &str, repo: &str, path: &str| {
            token == TOKEN && repo == "octo/prep" && path == "solutions/TwoSum.py"
        })
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _| Ok(None));

    let sink = captured.clone();
    api.expect_put_file()
        .times(1)
        .in_sequence(&mut seq)
        .returning(move |_, _, _, body: &PutFileBody| {
            sink.lock().unwrap().push(body.clone());
            Ok(put_response())
        });

    let publisher = RemotePublisher::new(api, store_with_token());
    let outcome = publisher.publish(&request()).await.expect("publish should succeed");

    assert_eq!(outcome.kind, PublishKind::Created);
    assert_eq!(outcome.commit_sha.as_deref(), Some("c0ffee"));
    assert_eq!(outcome.content_sha.as_deref(), Some("newblob"));

    let bodies = captured.lock().unwrap();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0].sha, None);
    let json = serde_json::to_value(&bodies[0]).unwrap();
    assert!(json.get("sha").is_none(), "create must not carry a sha: {json}");
    assert_eq!(bodies[0].message, "Add solution for Two Sum - 04/05");
    assert_eq!(decode_content(&bodies[0].content).unwrap(), request().content);
}

#[tokio::test]
async fn publish_threads_existing_sha_into_upsert() {
    let mut api = MockHostingApi::new();
    let mut seq = Sequence::new();

    api.expect_get_file()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _| {
            Ok(Some(RemoteFile {
                sha: "abc123".to_string(),
            }))
        });
    api.expect_put_file()
        .withf(|token: &str, repo: &str, path: &str, body: &PutFileBody| {
            token == TOKEN
                && repo == "octo/prep"
                && path == "solutions/TwoSum.py"
                && body.sha.as_deref() == Some("abc123")
        })
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _, _| Ok(put_response()));

    let publisher = RemotePublisher::new(api, store_with_token());
    let outcome = publisher.publish(&request()).await.expect("publish should succeed");
    assert_eq!(outcome.kind, PublishKind::Updated);
}

#[tokio::test]
async fn failed_probe_aborts_without_writing() {
    let mut api = MockHostingApi::new();
    api.expect_get_file().times(1).returning(|_, _, _| {
        Err(PublishError::Remote {
            status: 503,
            body: "unavailable".to_string(),
        })
    });
    api.expect_put_file().never();

    let publisher = RemotePublisher::new(api, store_with_token());
    let err = publisher.publish(&request()).await.unwrap_err();
    assert!(matches!(err, PublishError::Remote { status: 503, .. }), "{err:?}");
}

#[tokio::test]
async fn rejected_write_surfaces_as_error() {
    let mut api = MockHostingApi::new();
    api.expect_get_file().returning(|_, _, _| Ok(None));
    api.expect_put_file().returning(|_, _, _, _| {
        Err(PublishError::Conflict {
            status: 422,
            body: "\"sha\" wasn't supplied.".to_string(),
        })
    });

    let publisher = RemotePublisher::new(api, store_with_token());
    let err = publisher.publish(&request()).await.unwrap_err();
    assert!(matches!(err, PublishError::Conflict { status: 422, .. }));
}

#[tokio::test]
async fn unauthorized_probe_is_reported_as_unauthorized() {
    let mut api = MockHostingApi::new();
    api.expect_get_file()
        .returning(|_, _, _| Err(PublishError::Unauthorized { status: 401 }));
    api.expect_put_file().never();

    let publisher = RemotePublisher::new(api, store_with_token());
    let err = publisher.publish(&request()).await.unwrap_err();
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn every_remote_operation_requires_a_credential() {
    // No expectations: any call into the API would panic.
    let publisher = RemotePublisher::new(MockHostingApi::new(), MemoryStore::new());

    assert!(matches!(publisher.publish(&request()).await, Err(PublishError::NoCredential)));
    assert!(matches!(publisher.fetch_identity().await, Err(PublishError::NoCredential)));
    assert!(matches!(publisher.list_repositories().await, Err(PublishError::NoCredential)));
    assert!(matches!(publisher.probe(&request()).await, Err(PublishError::NoCredential)));
}

#[tokio::test]
async fn credential_slot_set_get_clear() {
    let publisher = RemotePublisher::new(MockHostingApi::new(), MemoryStore::new());
    assert_eq!(publisher.credential().unwrap(), None);

    publisher.set_credential("first").unwrap();
    publisher.set_credential("second").unwrap();
    assert_eq!(publisher.credential().unwrap().as_deref(), Some("second"));

    publisher.clear_credential().unwrap();
    assert_eq!(publisher.credential().unwrap(), None);
}

#[tokio::test]
async fn identity_and_repositories_use_the_stored_token() {
    let mut api = MockHostingApi::new();
    api.expect_current_user()
        .withf(|token: &str| token == TOKEN)
        .times(1)
        .returning(|_| {
            Ok(Identity {
                login: "octocat".to_string(),
                name: Some("The Octocat".to_string()),
                avatar_url: None,
            })
        });
    api.expect_list_repositories()
        .withf(|token: &str| token == TOKEN)
        .times(1)
        .returning(|_| {
            Ok(vec![
                RepositoryDescriptor {
                    id: 1,
                    full_name: "octocat/prep".to_string(),
                    is_private: true,
                },
                RepositoryDescriptor {
                    id: 2,
                    full_name: "octocat/hello".to_string(),
                    is_private: false,
                },
            ])
        });

    let publisher = RemotePublisher::new(api, store_with_token());
    assert_eq!(publisher.fetch_identity().await.unwrap().login, "octocat");
    let repos = publisher.list_repositories().await.unwrap();
    assert_eq!(repos.len(), 2);
    assert_eq!(repos[0].full_name, "octocat/prep");
}

#[tokio::test]
async fn listing_failure_is_distinguishable_from_empty() {
    let mut api = MockHostingApi::new();
    api.expect_list_repositories()
        .returning(|_| Err(PublishError::Transient("connection reset".to_string())));

    let publisher = RemotePublisher::new(api, store_with_token());
    assert!(matches!(
        publisher.list_repositories().await,
        Err(PublishError::Transient(_))
    ));
}

#[tokio::test]
async fn probe_and_upsert_can_be_driven_separately() {
    let mut api = MockHostingApi::new();
    api.expect_get_file().returning(|_, _, _| {
        Ok(Some(RemoteFile {
            sha: "abc123".to_string(),
        }))
    });
    api.expect_put_file()
        .withf(|_: &str, _: &str, _: &str, body: &PutFileBody| body.sha.is_none())
        .returning(|_, _, _, _| Ok(PutFileResponse::default()));

    let publisher = RemotePublisher::new(api, store_with_token());
    let probe = publisher.probe(&request()).await.unwrap();
    assert_eq!(probe.sha(), Some("abc123"));

    // An explicit Absent probe sends no sha regardless of what exists remotely.
    let outcome = publisher.upsert(&request(), &Probe::Absent).await.unwrap();
    assert_eq!(outcome.kind, PublishKind::Created);
    assert_eq!(outcome.commit_sha, None);
}

#[test]
fn commit_message_uses_zero_padded_month_and_day() {
    let april_fifth = NaiveDate::from_ymd_opt(2024, 4, 5).unwrap();
    assert_eq!(
        format_commit_message_on("Two Sum", april_fifth),
        "Add solution for Two Sum - 04/05"
    );
    let december = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
    assert_eq!(
        format_commit_message_on("LRU Cache", december),
        "Add solution for LRU Cache - 12/31"
    );
}

#[test]
fn commit_message_for_today_has_the_expected_shape() {
    let message = format_commit_message("Two Sum");
    let date = message
        .strip_prefix("Add solution for Two Sum - ")
        .expect("prefix");
    assert_eq!(date.len(), 5);
    assert_eq!(&date[2..3], "/");
}

#[test]
fn request_for_problem_derives_path_and_message() {
    let record = parse_problem_url("https://leetcode.com/problems/two-sum/").unwrap();
    let req = PublishRequest::for_problem(&record, "octo/prep", Some("leetcode/"), "py", "x".into());
    assert_eq!(req.path, "leetcode/TwoSum.py");
    assert_eq!(req.repository, "octo/prep");
    assert!(req.message.starts_with("Add solution for Two Sum - "));
}
