mod policy;
mod registry;

pub use policy::transport_plan;
pub use registry::ConnectionRegistry;
