/// Entity name used for system-wide metrics.
pub const SYSTEM_ENTITY_NAME: &str = "Overall";

/// Decimal places kept when recording metric values.
pub const METRIC_DECIMALS: i32 = 2;
