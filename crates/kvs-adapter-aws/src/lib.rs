use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_kinesisvideo::error::DisplayErrorContext;
use aws_sdk_kinesisvideo::operation::describe_stream::DescribeStreamError;
use aws_sdk_kinesisvideo::operation::update_data_retention::UpdateDataRetentionError;
use aws_sdk_kinesisvideo::types::{StreamInfo, UpdateDataRetentionOperation};
use kvs_core::{AdjustmentDirection, ProviderConfig, ResourceIdentifier, ResourceState};
use kvs_runtime::client::{LookupError, MutationError, ResourceClient};

/// Kinesis Video Streams client for one profile and region.
///
/// SDK-level retries are disabled: each describe or update is a single attempt,
/// bounded by the configured operation timeout.
pub struct KinesisVideoClient {
    client: aws_sdk_kinesisvideo::Client,
}

impl KinesisVideoClient {
    pub async fn new(config: &ProviderConfig) -> Self {
        let timeouts = TimeoutConfig::builder()
            .operation_timeout(config.timeout())
            .build();

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .profile_name(&config.profile)
            .region(Region::new(config.region.clone()))
            .timeout_config(timeouts)
            .retry_config(RetryConfig::disabled())
            .load()
            .await;

        tracing::debug!(
            profile = %config.profile,
            region = %config.region,
            timeout_secs = config.timeout_secs,
            "Kinesis Video client configured"
        );

        Self {
            client: aws_sdk_kinesisvideo::Client::new(&sdk_config),
        }
    }
}

#[async_trait]
impl ResourceClient for KinesisVideoClient {
    async fn describe(
        &self,
        identifier: &ResourceIdentifier,
    ) -> Result<ResourceState, LookupError> {
        let response = self
            .client
            .describe_stream()
            .stream_arn(identifier.as_str())
            .send()
            .await
            .map_err(|err| {
                let detail = DisplayErrorContext(&err).to_string();
                match err.as_service_error() {
                    Some(service) => classify_describe(service, detail),
                    None => LookupError::Describe(detail),
                }
            })?;

        state_from_info(identifier, response.stream_info())
    }

    async fn mutate(
        &self,
        identifier: &ResourceIdentifier,
        version_token: &str,
        direction: AdjustmentDirection,
        magnitude: u64,
    ) -> Result<(), MutationError> {
        let change = change_in_hours(magnitude)?;

        self.client
            .update_data_retention()
            .stream_arn(identifier.as_str())
            .current_version(version_token)
            .operation(operation_for(direction))
            .data_retention_change_in_hours(change)
            .send()
            .await
            .map_err(|err| {
                let detail = DisplayErrorContext(&err).to_string();
                match err.as_service_error() {
                    Some(service) => classify_update(service, detail),
                    None => MutationError::Provider(detail),
                }
            })?;

        Ok(())
    }
}

fn operation_for(direction: AdjustmentDirection) -> UpdateDataRetentionOperation {
    match direction {
        AdjustmentDirection::Increase => UpdateDataRetentionOperation::IncreaseDataRetention,
        AdjustmentDirection::Decrease => UpdateDataRetentionOperation::DecreaseDataRetention,
    }
}

fn change_in_hours(magnitude: u64) -> Result<i32, MutationError> {
    i32::try_from(magnitude).map_err(|_| {
        MutationError::Provider(format!(
            "retention change of {} hours exceeds the provider's range",
            magnitude
        ))
    })
}

fn state_from_info(
    identifier: &ResourceIdentifier,
    info: Option<&StreamInfo>,
) -> Result<ResourceState, LookupError> {
    let info = info.ok_or_else(|| {
        LookupError::Describe(format!("DescribeStream returned no StreamInfo for {}", identifier))
    })?;
    let version = info.version().ok_or_else(|| {
        LookupError::Describe(format!("DescribeStream returned no Version for {}", identifier))
    })?;
    let retention = info.data_retention_in_hours().ok_or_else(|| {
        LookupError::Describe(format!(
            "DescribeStream returned no DataRetentionInHours for {}",
            identifier
        ))
    })?;

    Ok(ResourceState {
        identifier: identifier.clone(),
        version_token: version.to_string(),
        retention_hours: i64::from(retention),
    })
}

fn classify_describe(err: &DescribeStreamError, detail: String) -> LookupError {
    if err.is_resource_not_found_exception() {
        LookupError::NotFound(detail)
    } else {
        LookupError::Describe(detail)
    }
}

fn classify_update(err: &UpdateDataRetentionError, detail: String) -> MutationError {
    if err.is_version_mismatch_exception() {
        MutationError::Conflict(detail)
    } else {
        MutationError::Provider(detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_kinesisvideo::types::error::{
        ClientLimitExceededException, ResourceNotFoundException, VersionMismatchException,
    };

    fn arn() -> ResourceIdentifier {
        ResourceIdentifier::parse("arn:aws:kinesisvideo:us-east-1:123456789012:stream/cam/1")
            .unwrap()
    }

    #[test]
    fn test_operation_mapping() {
        assert_eq!(
            operation_for(AdjustmentDirection::Increase),
            UpdateDataRetentionOperation::IncreaseDataRetention
        );
        assert_eq!(
            operation_for(AdjustmentDirection::Decrease),
            UpdateDataRetentionOperation::DecreaseDataRetention
        );
    }

    #[test]
    fn test_change_in_hours_range() {
        assert_eq!(change_in_hours(24).unwrap(), 24);
        assert!(matches!(
            change_in_hours(u64::MAX),
            Err(MutationError::Provider(_))
        ));
    }

    #[test]
    fn test_state_from_info() {
        let info = StreamInfo::builder()
            .version("abc123")
            .data_retention_in_hours(48)
            .build();

        let state = state_from_info(&arn(), Some(&info)).unwrap();
        assert_eq!(state.identifier, arn());
        assert_eq!(state.version_token, "abc123");
        assert_eq!(state.retention_hours, 48);
    }

    #[test]
    fn test_state_from_info_missing_fields() {
        assert!(matches!(
            state_from_info(&arn(), None),
            Err(LookupError::Describe(_))
        ));

        let info = StreamInfo::builder().data_retention_in_hours(0).build();
        assert!(matches!(
            state_from_info(&arn(), Some(&info)),
            Err(LookupError::Describe(_))
        ));
    }

    #[test]
    fn test_version_mismatch_is_conflict() {
        let err = UpdateDataRetentionError::VersionMismatchException(
            VersionMismatchException::builder()
                .message("stale version")
                .build(),
        );
        let classified =
            classify_update(&err, "VersionMismatchException: stale version".to_string());
        assert_eq!(
            classified,
            MutationError::Conflict("VersionMismatchException: stale version".to_string())
        );
    }

    #[test]
    fn test_other_update_errors_are_provider() {
        let err = UpdateDataRetentionError::ClientLimitExceededException(
            ClientLimitExceededException::builder().build(),
        );
        let classified = classify_update(&err, "ClientLimitExceededException".to_string());
        assert!(matches!(classified, MutationError::Provider(_)));
    }

    #[test]
    fn test_missing_stream_is_not_found() {
        let err = DescribeStreamError::ResourceNotFoundException(
            ResourceNotFoundException::builder().build(),
        );
        let classified = classify_describe(&err, "ResourceNotFoundException".to_string());
        assert!(matches!(classified, LookupError::NotFound(_)));
    }
}
