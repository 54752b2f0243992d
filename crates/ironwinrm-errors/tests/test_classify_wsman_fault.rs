use ironwinrm_errors::{TransportError, WinRmError};
use std::fs;

#[cfg(test)]
mod tests {
    use super::*;

    fn transport_error(body: String) -> TransportError {
        TransportError::builder()
            .protocol("http")
            .status_code(500)
            .response_text(body)
            .build()
    }

    #[test]
    #[tracing_test::traced_test]
    fn test_operation_timeout_fault_classifies_as_retryable() {
        let body = fs::read_to_string("tests/resources/operation_timeout_fault.xml")
            .expect("Failed to read operation_timeout_fault.xml file");

        let error = transport_error(body);
        assert_eq!(
            error.wsman_fault_code().as_deref(),
            Some(ironwinrm_errors::WSMAN_FAULT_CODE_OPERATION_TIMEOUT)
        );

        let classified = error.classify();
        assert!(matches!(classified, WinRmError::OperationTimeout));
        assert!(classified.is_retryable());
        assert_eq!(classified.code(), 500);
    }

    #[test]
    #[tracing_test::traced_test]
    fn test_other_faults_stay_transport_errors() {
        let body = fs::read_to_string("tests/resources/access_denied_fault.xml")
            .expect("Failed to read access_denied_fault.xml file");

        match transport_error(body).classify() {
            WinRmError::Transport(error) => {
                assert_eq!(error.status_code, 500);
                assert_eq!(error.fault_subcode().as_deref(), Some("w:AccessDenied"));
            }
            other => panic!("expected a transport error, got: {other:?}"),
        }
    }

    #[test]
    #[tracing_test::traced_test]
    fn test_non_xml_bodies_stay_transport_errors() {
        let classified = transport_error("Service Unavailable".to_owned()).classify();
        assert!(matches!(classified, WinRmError::Transport(_)));
        assert!(!classified.is_retryable());
    }
}
