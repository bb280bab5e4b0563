//! End-to-end coverage of the application tracking workflow: aggregation
//! across heterogeneous sources, filtered views, and status synchronization
//! back to the owning backends, both through the library API and the HTTP
//! router.

mod common {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use serde_json::Value;

    use placement_hub::tracking::{
        ApplicationTracker, DirectApplicationRecord, DirectApplicationSource, InternshipQuery,
        InternshipRecord, InternshipSource, SourceError,
    };

    pub(crate) const APPLICANT: &str = "career-cell@stateu.edu";

    pub(crate) fn direct_record(
        id: &str,
        status: Option<&str>,
        created: Option<&str>,
    ) -> DirectApplicationRecord {
        DirectApplicationRecord {
            id: id.to_string(),
            applicant_name: Some("Priya Sharma".to_string()),
            applicant_email: Some("priya@campusmail.dev".to_string()),
            status: status.map(str::to_string),
            application_type: Some("job".to_string()),
            created_date: created.map(str::to_string),
            title: Some("Backend Engineer".to_string()),
            company_name: Some("Horizon Labs".to_string()),
            ..DirectApplicationRecord::default()
        }
    }

    pub(crate) fn internship_record(
        id: &str,
        status: Option<&str>,
        created: Option<&str>,
    ) -> InternshipRecord {
        InternshipRecord {
            id: id.to_string(),
            title: Some("Data Science Internship".to_string()),
            company: Some("Quanta Metrics".to_string()),
            status: status.map(str::to_string),
            posted_by: Some(APPLICANT.to_string()),
            poster_name: Some("Career Cell".to_string()),
            created_date: created.map(str::to_string),
            ..InternshipRecord::default()
        }
    }

    pub(crate) struct MemoryDirects {
        records: Arc<Mutex<Vec<DirectApplicationRecord>>>,
    }

    impl MemoryDirects {
        pub(crate) fn new(records: Vec<DirectApplicationRecord>) -> Self {
            Self {
                records: Arc::new(Mutex::new(records)),
            }
        }

        pub(crate) fn stored_status(&self, id: &str) -> Option<String> {
            self.records
                .lock()
                .expect("records mutex poisoned")
                .iter()
                .find(|record| record.id == id)
                .and_then(|record| record.status.clone())
        }
    }

    #[async_trait]
    impl DirectApplicationSource for MemoryDirects {
        async fn list(&self) -> Result<Vec<DirectApplicationRecord>, SourceError> {
            Ok(self.records.lock().expect("records mutex poisoned").clone())
        }

        async fn list_for_recruiter(
            &self,
            _recruiter_id: &str,
        ) -> Result<Vec<DirectApplicationRecord>, SourceError> {
            self.list().await
        }

        async fn set_status(&self, id: &str, status: &str) -> Result<(), SourceError> {
            let mut records = self.records.lock().expect("records mutex poisoned");
            match records.iter_mut().find(|record| record.id == id) {
                Some(record) => {
                    record.status = Some(status.to_string());
                    Ok(())
                }
                None => Err(SourceError::NotFound(id.to_string())),
            }
        }
    }

    pub(crate) struct MemoryInternships {
        records: Arc<Mutex<Vec<InternshipRecord>>>,
    }

    impl MemoryInternships {
        pub(crate) fn new(records: Vec<InternshipRecord>) -> Self {
            Self {
                records: Arc::new(Mutex::new(records)),
            }
        }

        pub(crate) fn stored_status(&self, id: &str) -> Option<String> {
            self.records
                .lock()
                .expect("records mutex poisoned")
                .iter()
                .find(|record| record.id == id)
                .and_then(|record| record.status.clone())
        }
    }

    #[async_trait]
    impl InternshipSource for MemoryInternships {
        async fn list(
            &self,
            _query: &InternshipQuery,
        ) -> Result<Vec<InternshipRecord>, SourceError> {
            Ok(self.records.lock().expect("records mutex poisoned").clone())
        }

        async fn set_status(&self, id: &str, status: &str) -> Result<(), SourceError> {
            let mut records = self.records.lock().expect("records mutex poisoned");
            match records.iter_mut().find(|record| record.id == id) {
                Some(record) => {
                    record.status = Some(status.to_string());
                    Ok(())
                }
                None => Err(SourceError::NotFound(id.to_string())),
            }
        }
    }

    /// Internship source whose listing endpoint is down.
    pub(crate) struct UnavailableInternships;

    #[async_trait]
    impl InternshipSource for UnavailableInternships {
        async fn list(
            &self,
            _query: &InternshipQuery,
        ) -> Result<Vec<InternshipRecord>, SourceError> {
            Err(SourceError::Transport("upstream timed out".to_string()))
        }

        async fn set_status(&self, _id: &str, _status: &str) -> Result<(), SourceError> {
            Err(SourceError::Transport("upstream timed out".to_string()))
        }
    }

    pub(crate) use MemoryInternships as Internships;

    pub(crate) fn build_board(
        directs: Vec<DirectApplicationRecord>,
        internships: Vec<InternshipRecord>,
    ) -> (
        Arc<ApplicationTracker<MemoryDirects, Internships>>,
        Arc<MemoryDirects>,
        Arc<Internships>,
    ) {
        let directs = Arc::new(MemoryDirects::new(directs));
        let internships = Arc::new(Internships::new(internships));
        let tracker = Arc::new(ApplicationTracker::new(directs.clone(), internships.clone()));
        (tracker, directs, internships)
    }

    pub(crate) async fn read_json_body(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("response body is readable");
        serde_json::from_slice(&body).expect("response body is json")
    }
}

mod aggregation {
    use std::sync::Arc;

    use placement_hub::tracking::{ActorContext, ApplicationTracker, CanonicalStatus};

    use crate::common::{
        build_board, direct_record, internship_record, MemoryDirects, UnavailableInternships,
        APPLICANT,
    };

    #[tokio::test]
    async fn heterogeneous_sources_merge_into_one_sorted_collection() {
        let (tracker, _directs, _internships) = build_board(
            vec![direct_record("a1", Some("reviewed"), Some("2024-01-01"))],
            vec![internship_record("b1", Some("approved"), Some("2024-02-01"))],
        );

        let records = tracker.aggregate(&ActorContext::applicant(APPLICANT)).await;

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id.0, "b1");
        assert_eq!(
            records[0].status,
            CanonicalStatus::Other("approved".to_string())
        );
        assert_eq!(records[1].id.0, "a1");
        assert_eq!(records[1].status, CanonicalStatus::Reviewing);
    }

    #[tokio::test]
    async fn a_failing_source_degrades_instead_of_aborting() {
        let directs = Arc::new(MemoryDirects::new(vec![
            direct_record("a1", None, Some("2024-01-01")),
            direct_record("a2", None, Some("2024-01-02")),
        ]));
        let tracker = ApplicationTracker::new(directs, Arc::new(UnavailableInternships));

        let records = tracker.aggregate(&ActorContext::applicant(APPLICANT)).await;

        assert_eq!(records.len(), 2);
        let ids: Vec<&str> = records.iter().map(|record| record.id.0.as_str()).collect();
        assert_eq!(ids, vec!["a2", "a1"]);
    }
}

mod mutation {
    use placement_hub::tracking::{
        ActorContext, ApplicationId, CanonicalStatus, StatusUpdateError,
    };

    use crate::common::{build_board, direct_record, internship_record, APPLICANT};

    #[tokio::test]
    async fn bulk_updates_converge_across_sources_after_the_reload() {
        let (tracker, directs, internships) = build_board(
            vec![direct_record("a1", Some("pending"), Some("2024-01-01"))],
            vec![internship_record("b1", Some("pending"), Some("2024-02-01"))],
        );
        tracker.aggregate(&ActorContext::applicant(APPLICANT)).await;

        let ids = vec![
            ApplicationId("a1".to_string()),
            ApplicationId("b1".to_string()),
        ];
        let report = tracker
            .set_status_bulk(&ids, CanonicalStatus::Interviewed)
            .await;

        assert_eq!(report.attempted, 2);
        assert_eq!(report.updated.len(), 2);
        assert!(report.failed.is_empty());
        assert!(report.reloaded);

        assert_eq!(directs.stored_status("a1").as_deref(), Some("shortlisted"));
        assert_eq!(
            internships.stored_status("b1").as_deref(),
            Some("interviewed")
        );
        assert!(tracker
            .records()
            .iter()
            .all(|record| record.status == CanonicalStatus::Interviewed));
    }

    #[tokio::test]
    async fn unknown_ids_surface_in_the_report_instead_of_panicking() {
        let (tracker, _directs, _internships) = build_board(
            vec![direct_record("a1", Some("pending"), None)],
            Vec::new(),
        );
        tracker.aggregate(&ActorContext::applicant(APPLICANT)).await;

        let err = tracker
            .set_status(
                &ApplicationId("ghost".to_string()),
                CanonicalStatus::Accepted,
            )
            .await
            .expect_err("unknown id is rejected");
        match err {
            StatusUpdateError::UnknownApplication(id) => assert_eq!(id, "ghost"),
            other => panic!("expected UnknownApplication, got {other:?}"),
        }
    }
}

mod routing {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    use placement_hub::tracking::tracking_router;

    use crate::common::{build_board, direct_record, internship_record, read_json_body, APPLICANT};

    #[tokio::test]
    async fn aggregate_filter_and_bulk_update_over_http() {
        let (tracker, _directs, _internships) = build_board(
            vec![
                direct_record("a1", Some("reviewed"), Some("2024-01-01")),
                direct_record("a2", None, Some("2024-01-03")),
            ],
            vec![internship_record("b1", Some("pending"), Some("2024-01-02"))],
        );
        let router = tracking_router(tracker);

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/applications/aggregate")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({ "role": "applicant", "identity": APPLICANT }).to_string(),
                    ))
                    .expect("request builds"),
            )
            .await
            .expect("router handles request");
        assert_eq!(response.status(), StatusCode::OK);
        let board = read_json_body(response).await;
        let ids: Vec<&str> = board
            .as_array()
            .expect("array body")
            .iter()
            .map(|record| record["id"].as_str().expect("string id"))
            .collect();
        assert_eq!(ids, vec!["a2", "b1", "a1"]);

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/applications?search=intern")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router handles request");
        let filtered = read_json_body(response).await;
        assert_eq!(filtered.as_array().expect("array body").len(), 1);
        assert_eq!(filtered[0]["id"], json!("b1"));

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/applications/status")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({ "ids": ["a1", "b1"], "status": "interviewed" }).to_string(),
                    ))
                    .expect("request builds"),
            )
            .await
            .expect("router handles request");
        let report = read_json_body(response).await;
        assert_eq!(report["updated"], json!(["a1", "b1"]));
        assert_eq!(report["failed"], json!([]));
        assert_eq!(report["reloaded"], json!(true));

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/v1/applications?status=interviewed")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router handles request");
        let converged = read_json_body(response).await;
        assert_eq!(converged.as_array().expect("array body").len(), 2);
    }
}
