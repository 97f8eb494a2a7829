use std::path::Path;
use std::time::Duration;

use facematch_config::{self, ResolvedConfig};
use facematch_core::runner::{ComparisonConfig, DetectionConfig};
use facematch_core::service::ServiceSettings;

use crate::cli::{CompareArgs, DetectArgs, ServiceArgs};
use crate::errors::AppResult;

pub fn load_resolved_config(explicit: Option<&Path>) -> AppResult<ResolvedConfig> {
    match facematch_config::load_config(explicit)? {
        Some(loaded) => {
            tracing::debug!(
                target: "config",
                path = %loaded.source().display(),
                "loaded configuration"
            );
            Ok(ResolvedConfig::from_raw(loaded.contents))
        }
        None => {
            tracing::debug!(target: "config", "no configuration file found; using defaults");
            Ok(ResolvedConfig::default())
        }
    }
}

pub fn build_comparison_config(args: &CompareArgs, defaults: &ResolvedConfig) -> ComparisonConfig {
    ComparisonConfig {
        source: args
            .source
            .clone()
            .unwrap_or_else(|| defaults.source_image.clone()),
        target: args
            .target
            .clone()
            .unwrap_or_else(|| defaults.target_image.clone()),
        similarity_threshold: args.threshold.unwrap_or(defaults.similarity_threshold),
        service: build_service_settings(&args.service, defaults),
    }
}

pub fn build_detection_config(args: &DetectArgs, defaults: &ResolvedConfig) -> DetectionConfig {
    DetectionConfig {
        image: args.image.clone(),
        service: build_service_settings(&args.service, defaults),
    }
}

fn build_service_settings(args: &ServiceArgs, defaults: &ResolvedConfig) -> ServiceSettings {
    let mut settings = ServiceSettings::from(defaults);
    if let Some(region) = &args.region {
        settings.region = Some(region.clone());
    }
    if let Some(profile) = &args.profile {
        settings.profile = Some(profile.clone());
    }
    if let Some(endpoint) = &args.endpoint_url {
        settings.endpoint_url = Some(endpoint.clone());
    }
    if let Some(secs) = args.timeout_secs {
        settings.call_timeout = Duration::from_secs(secs.max(1));
    }
    settings
}
