//! # Lightsail Adapter
//!
//! Implements `InstanceControl` against AWS Lightsail with `aws-sdk-lightsail`.
//! Credentials come from the ambient AWS chain (environment, profile, IMDS);
//! only the region is configured here. Calls are never retried by this layer.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_config::retry::RetryConfig;
use aws_sdk_lightsail::Client;
use aws_sdk_lightsail::config::Region;
use aws_sdk_lightsail::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};

use crate::domain::error::ControlError;
use crate::domain::traits::InstanceControl;
use crate::domain::types::{InstanceRef, InstanceState};

#[derive(Clone)]
pub struct LightsailService {
    client: Client,
}

impl LightsailService {
    pub async fn new(region: &str) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .retry_config(RetryConfig::disabled())
            .load()
            .await;
        Self {
            client: Client::new(&sdk_config),
        }
    }
}

/// Keeps the provider's error code (e.g. `ThrottlingException`) in the text users see.
fn describe<E, R>(operation: &'static str, err: SdkError<E, R>) -> ControlError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let message = match (err.code(), err.message()) {
        (Some(code), Some(msg)) => format!("{code}: {msg}"),
        (Some(code), None) => code.to_string(),
        (None, Some(msg)) => msg.to_string(),
        (None, None) => DisplayErrorContext(&err).to_string(),
    };
    ControlError::provider(operation, message)
}

#[async_trait]
impl InstanceControl for LightsailService {
    async fn start_instance(&self, instance: &InstanceRef) -> Result<(), ControlError> {
        tracing::info!("Lightsail StartInstance {}", instance);
        self.client
            .start_instance()
            .instance_name(instance.as_str())
            .send()
            .await
            .map_err(|e| describe("StartInstance", e))?;
        Ok(())
    }

    async fn stop_instance(&self, instance: &InstanceRef) -> Result<(), ControlError> {
        tracing::info!("Lightsail StopInstance {}", instance);
        self.client
            .stop_instance()
            .instance_name(instance.as_str())
            .send()
            .await
            .map_err(|e| describe("StopInstance", e))?;
        Ok(())
    }

    async fn reboot_instance(&self, instance: &InstanceRef) -> Result<(), ControlError> {
        tracing::info!("Lightsail RebootInstance {}", instance);
        self.client
            .reboot_instance()
            .instance_name(instance.as_str())
            .send()
            .await
            .map_err(|e| describe("RebootInstance", e))?;
        Ok(())
    }

    async fn get_instance_state(
        &self,
        instance: &InstanceRef,
    ) -> Result<InstanceState, ControlError> {
        let output = self
            .client
            .get_instance()
            .instance_name(instance.as_str())
            .send()
            .await
            .map_err(|e| describe("GetInstance", e))?;

        output
            .instance()
            .and_then(|i| i.state())
            .and_then(|s| s.name())
            .map(InstanceState::new)
            .ok_or(ControlError::MissingState)
    }
}
