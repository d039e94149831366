//! Logging and tracing setup.
//!
//! Events go to stdout through the `tracing-subscriber` fmt layer, filtered by
//! `RUST_LOG` (default `info`). With the `telemetry` feature and any
//! `OTEL_EXPORTER_OTLP_*` variable set, spans are additionally exported over
//! OTLP.

use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, HttpMakeClassifier, TraceLayer};
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(feature = "telemetry")]
use opentelemetry::trace::TracerProvider as _;
#[cfg(feature = "telemetry")]
use opentelemetry_sdk::trace::SdkTracerProvider;

const DEFAULT_DIRECTIVE: &str = "info";

/// Builder for the process-wide tracing subscriber.
#[derive(Debug, Clone)]
pub struct Telemetry {
    name: &'static str,
    version: &'static str,
}

impl Default for Telemetry {
    fn default() -> Self {
        Self::new()
    }
}

impl Telemetry {
    pub fn new() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
        }
    }

    /// Service name reported to the OTLP collector.
    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    pub fn with_version(mut self, version: &'static str) -> Self {
        self.version = version;
        self
    }

    /// Installs the global subscriber. Call once per process.
    pub fn register(self) -> TelemetryGuard {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
        self.install(filter)
    }

    #[cfg(feature = "telemetry")]
    fn install(&self, filter: EnvFilter) -> TelemetryGuard {
        let (tracer_provider, export_error) = match otlp::Protocol::from_env() {
            Some(protocol) => match otlp::tracer_provider(protocol, self.name, self.version) {
                Ok(provider) => (Some(provider), None),
                Err(error) => (None, Some(error)),
            },
            None => (None, None),
        };
        let otel_layer = tracer_provider.as_ref().map(|provider| {
            tracing_opentelemetry::OpenTelemetryLayer::new(provider.tracer(self.name))
        });
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .with(otel_layer)
            .init();
        match (&tracer_provider, export_error) {
            (Some(_), _) => tracing::info!("OpenTelemetry span export is enabled"),
            (None, Some(error)) => {
                tracing::warn!(%error, "OpenTelemetry exporter could not be built")
            }
            (None, None) => tracing::info!("OpenTelemetry is not enabled"),
        }
        TelemetryGuard { tracer_provider }
    }

    #[cfg(not(feature = "telemetry"))]
    fn install(&self, filter: EnvFilter) -> TelemetryGuard {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
        tracing::debug!(service = self.name, version = self.version, "Logging initialized");
        TelemetryGuard {}
    }
}

/// Keeps exporters alive; flushes them on drop.
pub struct TelemetryGuard {
    #[cfg(feature = "telemetry")]
    tracer_provider: Option<SdkTracerProvider>,
}

impl TelemetryGuard {
    /// Per-request spans for the HTTP router.
    pub fn http_tracing(&self) -> TraceLayer<HttpMakeClassifier> {
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO))
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        #[cfg(feature = "telemetry")]
        if let Some(tracer_provider) = self.tracer_provider.as_ref() {
            if let Err(err) = tracer_provider.shutdown() {
                eprintln!("{err:?}");
            }
        }
    }
}

#[cfg(feature = "telemetry")]
mod otlp {
    use opentelemetry::KeyValue;
    use opentelemetry_sdk::Resource;
    use opentelemetry_sdk::trace::{RandomIdGenerator, Sampler, SdkTracerProvider};
    use opentelemetry_semantic_conventions::SCHEMA_URL;
    use opentelemetry_semantic_conventions::attribute::{
        DEPLOYMENT_ENVIRONMENT_NAME, SERVICE_VERSION,
    };
    use std::env;

    /// Transport for OTLP export.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Protocol {
        Http,
        Grpc,
    }

    impl Protocol {
        /// `None` unless at least one `OTEL_EXPORTER_OTLP_*` variable is set.
        pub fn from_env() -> Option<Self> {
            let configured = ["ENDPOINT", "HEADERS", "PROTOCOL"]
                .iter()
                .any(|suffix| env::var(format!("OTEL_EXPORTER_OTLP_{suffix}")).is_ok());
            if !configured {
                return None;
            }
            match env::var("OTEL_EXPORTER_OTLP_PROTOCOL").as_deref() {
                Ok("grpc") => Some(Protocol::Grpc),
                _ => Some(Protocol::Http),
            }
        }
    }

    fn resource(name: &'static str, version: &'static str) -> Resource {
        let deployment_env = env::var("DEPLOYMENT_ENV").unwrap_or_else(|_| "develop".to_string());
        Resource::builder()
            .with_service_name(name)
            .with_schema_url(
                [
                    KeyValue::new(SERVICE_VERSION, version),
                    KeyValue::new(DEPLOYMENT_ENVIRONMENT_NAME, deployment_env),
                ],
                SCHEMA_URL,
            )
            .build()
    }

    pub fn tracer_provider(
        protocol: Protocol,
        name: &'static str,
        version: &'static str,
    ) -> Result<SdkTracerProvider, opentelemetry_otlp::ExporterBuildError> {
        let exporter = opentelemetry_otlp::SpanExporter::builder();
        let exporter = match protocol {
            Protocol::Http => exporter.with_http().build()?,
            Protocol::Grpc => exporter.with_tonic().build()?,
        };
        Ok(SdkTracerProvider::builder()
            .with_sampler(Sampler::ParentBased(Box::new(Sampler::AlwaysOn)))
            .with_id_generator(RandomIdGenerator::default())
            .with_resource(resource(name, version))
            .with_batch_exporter(exporter)
            .build())
    }
}
