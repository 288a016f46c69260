//! EC2 instance client
//!
//! Implements [`InstanceProvider`] over the AWS SDK for the single
//! instance the bot manages.

use crate::error::{AppError, Result};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_ec2::{
    Client,
    types::{Instance, InstanceStateName},
};
use aws_types::region::Region;
use mcpilot_core::{
    InstanceDescription, InstanceId, InstanceProvider, InstanceState, PublicAddress,
};
use tracing::{debug, info};

/// Default AWS region
pub const DEFAULT_REGION: &str = "us-east-1";

/// Create EC2 client from environment credentials
pub async fn create_ec2_client(region: Option<String>) -> Client {
    let region_str = region.unwrap_or_else(|| DEFAULT_REGION.to_string());
    debug!("Creating EC2 client for region: {}", region_str);

    let config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region_str))
        .load()
        .await;

    Client::new(&config)
}

/// Map the SDK state enum onto the controller's run-state
pub fn instance_state(name: &InstanceStateName) -> InstanceState {
    match name {
        InstanceStateName::Pending => InstanceState::Pending,
        InstanceStateName::Running => InstanceState::Running,
        InstanceStateName::Stopping => InstanceState::Stopping,
        InstanceStateName::Stopped => InstanceState::Stopped,
        other => InstanceState::from_name(other.as_str()),
    }
}

/// Build a description from an SDK instance
pub fn describe(instance: &Instance) -> InstanceDescription {
    let state = instance
        .state
        .as_ref()
        .and_then(|s| s.name.as_ref())
        .map(instance_state)
        .unwrap_or_else(InstanceState::unknown);

    InstanceDescription {
        state,
        address: PublicAddress {
            dns_name: instance.public_dns_name.clone(),
            ipv4: instance.public_ip_address.clone(),
        },
    }
}

/// EC2-backed instance provider
#[derive(Clone)]
pub struct Ec2InstanceProvider {
    client: Client,
}

impl Ec2InstanceProvider {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create from region, using the default credential chain
    pub async fn from_region(region: impl Into<String>) -> Self {
        Self::new(create_ec2_client(Some(region.into())).await)
    }

    async fn describe_one(&self, id: &InstanceId) -> Result<InstanceDescription> {
        debug!(instance_id = %id, "Describing instance");

        let response = self
            .client
            .describe_instances()
            .instance_ids(id.as_str())
            .send()
            .await
            .map_err(AppError::from_ec2)?;

        let instance = response
            .reservations()
            .first()
            .and_then(|reservation| reservation.instances().first())
            .ok_or_else(|| AppError::InstanceNotFound(id.to_string()))?;

        Ok(describe(instance))
    }

    async fn start_one(&self, id: &InstanceId) -> Result<()> {
        self.client
            .start_instances()
            .instance_ids(id.as_str())
            .send()
            .await
            .map_err(AppError::from_ec2)?;

        info!(instance_id = %id, "Instance start initiated");
        Ok(())
    }

    async fn stop_one(&self, id: &InstanceId) -> Result<()> {
        self.client
            .stop_instances()
            .instance_ids(id.as_str())
            .send()
            .await
            .map_err(AppError::from_ec2)?;

        info!(instance_id = %id, "Instance stop initiated");
        Ok(())
    }
}

#[async_trait]
impl InstanceProvider for Ec2InstanceProvider {
    async fn describe_instance(
        &self,
        id: &InstanceId,
    ) -> mcpilot_core::Result<InstanceDescription> {
        Ok(self.describe_one(id).await?)
    }

    async fn start_instance(&self, id: &InstanceId) -> mcpilot_core::Result<()> {
        Ok(self.start_one(id).await?)
    }

    async fn stop_instance(&self, id: &InstanceId) -> mcpilot_core::Result<()> {
        Ok(self.stop_one(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_ec2::types::InstanceState as AwsInstanceState;

    fn aws_instance(state: InstanceStateName) -> Instance {
        Instance::builder()
            .instance_id("i-0123456789abcdef0")
            .state(AwsInstanceState::builder().name(state).build())
            .build()
    }

    #[test]
    fn test_instance_state_mapping() {
        assert_eq!(instance_state(&InstanceStateName::Running), InstanceState::Running);
        assert_eq!(instance_state(&InstanceStateName::Stopped), InstanceState::Stopped);
        assert_eq!(
            instance_state(&InstanceStateName::ShuttingDown),
            InstanceState::Other("shutting-down".to_string())
        );
        assert_eq!(instance_state(&InstanceStateName::Terminated).to_string(), "terminated");
    }

    #[test]
    fn test_describe_running_instance() {
        let instance = Instance::builder()
            .instance_id("i-0123456789abcdef0")
            .state(AwsInstanceState::builder().name(InstanceStateName::Running).build())
            .public_dns_name("ec2-3-3-3-3.compute-1.amazonaws.com")
            .public_ip_address("3.3.3.3")
            .build();

        let description = describe(&instance);
        assert_eq!(description.state, InstanceState::Running);
        assert_eq!(description.address.host(), Some("ec2-3-3-3-3.compute-1.amazonaws.com"));
        assert_eq!(description.address.ipv4.as_deref(), Some("3.3.3.3"));
    }

    #[test]
    fn test_describe_stopped_instance_has_no_address() {
        let description = describe(&aws_instance(InstanceStateName::Stopped));
        assert_eq!(description.state, InstanceState::Stopped);
        assert!(description.address.is_empty());
    }

    #[test]
    fn test_describe_missing_state() {
        let instance = Instance::builder().instance_id("i-1").build();
        assert_eq!(describe(&instance).state, InstanceState::unknown());
    }
}
