use shared::metrics_defs::{MetricDef, MetricType};

pub const SUPPLIER_FETCH_DURATION: MetricDef = MetricDef {
    name: "supplier.fetch.duration",
    metric_type: MetricType::Histogram,
    description: "Time to fetch and normalize one supplier feed in seconds. Tagged with supplier, status.",
};

pub const SUPPLIER_FETCH_FAILURES: MetricDef = MetricDef {
    name: "supplier.fetch.failures",
    metric_type: MetricType::Counter,
    description: "Supplier fetches that produced no usable data. Tagged with supplier.",
};

pub const SUPPLIER_RECORDS: MetricDef = MetricDef {
    name: "supplier.records",
    metric_type: MetricType::Histogram,
    description: "Number of records returned by a supplier. Tagged with supplier.",
};

pub const HOTELS_MERGED: MetricDef = MetricDef {
    name: "pipeline.hotels.merged",
    metric_type: MetricType::Gauge,
    description: "Distinct hotels after reconciliation in the last run",
};

pub const HOTELS_REJECTED: MetricDef = MetricDef {
    name: "pipeline.hotels.rejected",
    metric_type: MetricType::Counter,
    description: "Canonical records rejected by validation",
};

pub const STORE_FAILURES: MetricDef = MetricDef {
    name: "pipeline.store.failures",
    metric_type: MetricType::Counter,
    description: "Failed writes to the hotel repository. Tagged with kind (hotel, destination).",
};

pub const PIPELINE_RUN_DURATION: MetricDef = MetricDef {
    name: "pipeline.run.duration",
    metric_type: MetricType::Histogram,
    description: "Duration of a full pipeline run in seconds. Tagged with status.",
};

pub const ALL_METRICS: &[MetricDef] = &[
    SUPPLIER_FETCH_DURATION,
    SUPPLIER_FETCH_FAILURES,
    SUPPLIER_RECORDS,
    HOTELS_MERGED,
    HOTELS_REJECTED,
    STORE_FAILURES,
    PIPELINE_RUN_DURATION,
];
