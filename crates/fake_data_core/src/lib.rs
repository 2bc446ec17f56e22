pub mod assembler;
pub mod batch;
pub mod catalog;
pub mod domain;
pub mod normalizer;
pub mod pagination;
pub mod ports;
pub mod seed;

pub use catalog::{FieldRegistry, FieldSpec, ValueKind};
pub use domain::{
    GenerationConfig, GenerationParams, LengthSchema, LengthTarget, Limits, Page, PageRequest,
    PaginationMeta, Record, Session, ValidationError,
};
pub use pagination::{PagePlan, PaginationController, PaginationError};
pub use ports::{
    ArchivedPage, Clock, ManualClock, PageArchive, PortError, PortResult, SessionStore, SystemClock,
};
