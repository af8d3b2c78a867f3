// Deterministic calculator endpoints. No model involved: pure arithmetic in
// formulas, thin handlers on top. Each response data object is shaped so the
// caller can feed it straight into the matching analyze endpoint.

pub mod formulas;
pub mod handlers;
