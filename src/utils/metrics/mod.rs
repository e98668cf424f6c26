//! Prometheus metrics.
//!
//! All metrics live in the global [`REGISTRY`] and are exposed by the API at `/metrics`.

use lazy_static::lazy_static;
use prometheus::{Encoder, Gauge, GaugeVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use sysinfo::System;

lazy_static! {
	/// Global Prometheus registry.
	pub static ref REGISTRY: Registry = Registry::new();

	/// Gauge for CPU usage percentage across all cores.
	pub static ref CPU_USAGE: Gauge = {
		let gauge = Gauge::new("cpu_usage_percentage", "Current CPU usage percentage").unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};

	/// Gauge for memory usage percentage.
	pub static ref MEMORY_USAGE_PERCENT: Gauge = {
		let gauge = Gauge::new("memory_usage_percentage", "Memory usage percentage").unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};

	/// Gauge for memory usage in bytes.
	pub static ref MEMORY_USAGE: Gauge = {
		let gauge = Gauge::new("memory_usage_bytes", "Memory usage in bytes").unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};

	/// Gauge for the number of configured networks, labelled by tier.
	pub static ref NETWORKS_CONFIGURED: GaugeVec = {
		let gauge = GaugeVec::new(
			Opts::new("networks_configured", "Number of configured networks per tier"),
			&["tier"]
		).unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};

	/// Counter of API requests by route and response status.
	pub static ref HTTP_REQUESTS: IntCounterVec = {
		let counter = IntCounterVec::new(
			Opts::new("http_requests_total", "Number of API requests by route and status"),
			&["route", "status"]
		).unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};

	/// Counter of batches pulled from the indexer, labelled by network.
	pub static ref UPSTREAM_BATCHES: IntCounterVec = {
		let counter = IntCounterVec::new(
			Opts::new("upstream_batches_total", "Number of batches received from the indexer"),
			&["network"]
		).unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};

	/// Counter of transactions returned to callers.
	pub static ref TRANSACTIONS_RETURNED: IntCounter = {
		let counter = IntCounter::new("transactions_returned_total", "Number of transactions returned by the API").unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};
}

/// Gather all metrics and encode them in the Prometheus text format.
pub fn gather_metrics() -> Result<Vec<u8>, Box<dyn std::error::Error>> {
	let encoder = TextEncoder::new();
	let metric_families = REGISTRY.gather();
	let mut buffer = Vec::new();
	encoder.encode(&metric_families, &mut buffer)?;
	Ok(buffer)
}

/// Updates the CPU and memory gauges.
pub fn update_system_metrics() {
	let mut sys = System::new_all();
	sys.refresh_all();

	CPU_USAGE.set(sys.global_cpu_usage() as f64);

	let total_memory = sys.total_memory();
	let memory_usage = sys.used_memory();
	MEMORY_USAGE.set(memory_usage as f64);

	let memory_percentage = if total_memory > 0 {
		(memory_usage as f64 / total_memory as f64) * 100.0
	} else {
		0.0
	};
	MEMORY_USAGE_PERCENT.set(memory_percentage);
}

/// Sets the per-tier network gauge from the loaded catalog.
pub fn update_network_metrics(networks: &[crate::models::NetworkConfig]) {
	NETWORKS_CONFIGURED.reset();

	let mut counts = std::collections::HashMap::<String, usize>::new();
	for network in networks {
		*counts.entry(network.tier.to_string()).or_insert(0) += 1;
	}

	for (tier, count) in counts {
		NETWORKS_CONFIGURED
			.with_label_values(&[tier.as_str()])
			.set(count as f64);
	}
}

/// Counts one API response.
pub fn record_request(route: &str, status: u16) {
	HTTP_REQUESTS
		.with_label_values(&[route, status.to_string().as_str()])
		.inc();
}
