use photopro_logging::{pp_error, pp_info, pp_warn};

use crate::{ApiError, CleanupReport, ProcessingApi};

/// Deletes every server artifact, trying `/api/cleanup` first and
/// `/api/delete_all` when that fails or reports failure.
///
/// The error returned when both routes fail is the fallback's.
pub async fn clear_all_with_fallback(api: &dyn ProcessingApi) -> Result<CleanupReport, ApiError> {
    match api.cleanup().await {
        Ok(report) => {
            pp_info!(
                "Cleanup removed {} files ({} errors)",
                report.deleted_count,
                report.errors.len()
            );
            Ok(report)
        }
        Err(primary) => {
            pp_warn!(
                "Cleanup failed ({}: {}); falling back to delete_all",
                primary.kind,
                primary.message
            );
            match api.delete_all().await {
                Ok(report) => {
                    pp_info!("delete_all removed {} files", report.deleted_count);
                    Ok(report)
                }
                Err(fallback) => {
                    pp_error!(
                        "delete_all failed too ({}: {})",
                        fallback.kind,
                        fallback.message
                    );
                    Err(fallback)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::{CleanupRoute, FailureKind, ProcessOutcome, ProcessRequest, RemoteFile};

    struct ScriptedApi {
        cleanup: Result<CleanupReport, ApiError>,
        delete_all: Result<CleanupReport, ApiError>,
        calls: Mutex<Vec<&'static str>>,
    }

    impl ScriptedApi {
        fn new(
            cleanup: Result<CleanupReport, ApiError>,
            delete_all: Result<CleanupReport, ApiError>,
        ) -> Self {
            Self {
                cleanup,
                delete_all,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    fn report(route: CleanupRoute, deleted_count: u64) -> CleanupReport {
        CleanupReport {
            route,
            deleted_count,
            errors: Vec::new(),
        }
    }

    fn failure(kind: FailureKind, message: &str) -> ApiError {
        ApiError::new(kind, message)
    }

    #[async_trait::async_trait]
    impl ProcessingApi for ScriptedApi {
        async fn process(&self, _request: &ProcessRequest) -> Result<ProcessOutcome, ApiError> {
            unreachable!("not used by cleanup")
        }

        async fn upscaler_available(&self) -> Result<bool, ApiError> {
            unreachable!("not used by cleanup")
        }

        async fn list_files(&self) -> Result<Vec<RemoteFile>, ApiError> {
            unreachable!("not used by cleanup")
        }

        async fn cleanup(&self) -> Result<CleanupReport, ApiError> {
            self.calls.lock().unwrap().push("cleanup");
            self.cleanup.clone()
        }

        async fn delete_all(&self) -> Result<CleanupReport, ApiError> {
            self.calls.lock().unwrap().push("delete_all");
            self.delete_all.clone()
        }

        async fn download(&self, _url: &str) -> Result<Vec<u8>, ApiError> {
            unreachable!("not used by cleanup")
        }
    }

    fn block_on<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(future)
    }

    #[test]
    fn primary_success_skips_fallback() {
        let api = ScriptedApi::new(
            Ok(report(CleanupRoute::Cleanup, 3)),
            Ok(report(CleanupRoute::DeleteAll, 9)),
        );
        let result = block_on(clear_all_with_fallback(&api)).unwrap();
        assert_eq!(result.route, CleanupRoute::Cleanup);
        assert_eq!(api.calls(), vec!["cleanup"]);
    }

    #[test]
    fn primary_failure_uses_fallback() {
        let api = ScriptedApi::new(
            Err(failure(FailureKind::HttpStatus(500), "Server error: 500")),
            Ok(report(CleanupRoute::DeleteAll, 2)),
        );
        let result = block_on(clear_all_with_fallback(&api)).unwrap();
        assert_eq!(result.route, CleanupRoute::DeleteAll);
        assert_eq!(result.deleted_count, 2);
        assert_eq!(api.calls(), vec!["cleanup", "delete_all"]);
    }

    #[test]
    fn both_failing_reports_fallback_error() {
        let api = ScriptedApi::new(
            Err(failure(FailureKind::Rejected, "locked")),
            Err(failure(FailureKind::Network, "connection refused")),
        );
        let err = block_on(clear_all_with_fallback(&api)).unwrap_err();
        assert_eq!(err.kind, FailureKind::Network);
        assert_eq!(api.calls(), vec!["cleanup", "delete_all"]);
    }
}
