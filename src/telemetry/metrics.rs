//! Prometheus metrics setup and metric definitions

use anyhow::{Context, Result};
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus recorder and return a handle for rendering metrics.
pub fn install_prometheus_recorder() -> Result<PrometheusHandle> {
    // Store round trips are expected in the low milliseconds
    let buckets = vec![
        0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
    ];

    PrometheusBuilder::new()
        .set_buckets(&buckets)
        .context("failed to set histogram buckets")?
        .install_recorder()
        .context("failed to install Prometheus recorder")
}

/// Register metric descriptions and emit initial zero values so Prometheus output
/// includes HELP/TYPE lines for all metrics from startup.
pub fn describe_metrics() {
    describe_counter!(
        "cardwizz_auth_sign_in_total",
        "Total number of provider sign-in attempts"
    );
    describe_counter!(
        "cardwizz_identity_resolutions_total",
        "Identity resolutions by outcome (matched/linked/created/error)"
    );
    describe_histogram!(
        "cardwizz_identity_resolution_duration_seconds",
        "Identity resolution duration in seconds, store calls included"
    );

    for result in ["success", "failure"] {
        counter!("cardwizz_auth_sign_in_total", "provider" => "apple", "result" => result)
            .absolute(0);
    }
    for outcome in ["matched", "linked", "created", "error"] {
        counter!("cardwizz_identity_resolutions_total", "outcome" => outcome).absolute(0);
    }
    histogram!("cardwizz_identity_resolution_duration_seconds").record(0.0);
}
