//! OpenTelemetry tracer provider setup.

use std::time::Duration;

use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    Resource,
    trace::{RandomIdGenerator, Sampler, SdkTracerProvider},
};

use crate::config::{ServerConfig, observability::ObservabilityConfig};

use super::ObservabilityError;

pub(super) fn build_tracer_provider(
    config: &ServerConfig,
) -> Result<SdkTracerProvider, ObservabilityError> {
    let config = &config.observability;

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(config.otel_exporter_otlp_endpoint.clone())
        .with_timeout(Duration::from_secs(config.otel_exporter_otlp_timeout_seconds))
        .build()?;

    Ok(SdkTracerProvider::builder()
        .with_sampler(sampler(config.otel_trace_sample_ratio))
        .with_id_generator(RandomIdGenerator::default())
        .with_resource(resource(config))
        .with_batch_exporter(exporter)
        .build())
}

fn resource(config: &ObservabilityConfig) -> Resource {
    Resource::builder_empty()
        .with_service_name(config.otel_service_name.clone())
        .with_attributes([
            KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
            KeyValue::new(
                "deployment.environment.name",
                config.otel_deployment_environment.clone(),
            ),
        ])
        .build()
}

/// Follow the caller's sampling decision, otherwise sample `ratio` of new traces.
fn sampler(ratio: f64) -> Sampler {
    Sampler::ParentBased(Box::new(root_sampler(ratio)))
}

/// Decision for traces that arrive without a sampled parent.
fn root_sampler(ratio: f64) -> Sampler {
    if ratio.is_nan() || ratio >= 1.0 {
        Sampler::AlwaysOn
    } else if ratio <= 0.0 {
        Sampler::AlwaysOff
    } else {
        Sampler::TraceIdRatioBased(ratio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_decision_is_respected() {
        assert!(
            matches!(sampler(0.25), Sampler::ParentBased(_)),
            "sampler should defer to the parent span"
        );
    }

    #[test]
    fn out_of_range_ratios_become_always_or_never() {
        assert!(matches!(root_sampler(2.5), Sampler::AlwaysOn), "above 1 samples all");
        assert!(matches!(root_sampler(f64::NAN), Sampler::AlwaysOn), "NaN samples all");
        assert!(matches!(root_sampler(-0.5), Sampler::AlwaysOff), "below 0 samples none");
    }

    #[test]
    fn fractional_ratio_is_kept() {
        let root = root_sampler(0.25);

        assert!(
            matches!(
                root,
                Sampler::TraceIdRatioBased(ratio) if (ratio - 0.25).abs() < f64::EPSILON
            ),
            "0.25 should sample a quarter of traces"
        );
    }
}
