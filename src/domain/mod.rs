// Domain layer: the pollution record, the response extractor and the ports
// (interfaces) the adapters implement. No I/O happens here.

pub mod extract;
pub mod model;
pub mod ports;
