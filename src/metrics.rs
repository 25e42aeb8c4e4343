use crate::error::FlightSearchError;
use crate::otel;
use opentelemetry::KeyValue;
use opentelemetry::metrics::Counter;
use std::sync::OnceLock;

pub fn inc_flight_search_success() {
    flight_search_success().add(1, &[])
}

pub fn inc_flight_search_error(error: &FlightSearchError) {
    let attributes = vec![KeyValue::new("kind", error.kind().to_string())];
    flight_search_error().add(1, &attributes)
}

pub fn inc_generation_success() {
    generation_success().add(1, &[])
}

pub fn inc_generation_error() {
    generation_error().add(1, &[])
}

fn flight_search_success() -> &'static Counter<u64> {
    static COUNTER: OnceLock<Counter<u64>> = OnceLock::new();
    COUNTER.get_or_init(|| {
        let meter = otel::get_meter();
        meter
            .u64_counter("flight_search_success")
            .with_description("Number of successful flight provider lookups")
            .build()
    })
}

fn flight_search_error() -> &'static Counter<u64> {
    static COUNTER: OnceLock<Counter<u64>> = OnceLock::new();
    COUNTER.get_or_init(|| {
        let meter = otel::get_meter();
        meter
            .u64_counter("flight_search_error")
            .with_description("Number of failed flight provider lookups")
            .build()
    })
}

fn generation_success() -> &'static Counter<u64> {
    static COUNTER: OnceLock<Counter<u64>> = OnceLock::new();
    COUNTER.get_or_init(|| {
        let meter = otel::get_meter();
        meter
            .u64_counter("generation_success")
            .with_description("Number of successful text-generation calls")
            .build()
    })
}

fn generation_error() -> &'static Counter<u64> {
    static COUNTER: OnceLock<Counter<u64>> = OnceLock::new();
    COUNTER.get_or_init(|| {
        let meter = otel::get_meter();
        meter
            .u64_counter("generation_error")
            .with_description("Number of failed text-generation calls")
            .build()
    })
}
