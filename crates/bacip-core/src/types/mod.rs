/// Zero-copy application-layer data values.
pub mod data_value;
/// Packed object identifier (type + instance).
pub mod object_id;
/// BACnet object type enumeration.
pub mod object_type;
/// BACnet property identifier enumeration.
pub mod property_id;
/// The four Status_Flags booleans.
pub mod status_flags;

pub use data_value::DataValue;
#[cfg(feature = "alloc")]
pub use data_value::PropertyValue;
pub use object_id::ObjectId;
pub use object_type::ObjectType;
pub use property_id::PropertyId;
pub use status_flags::StatusFlags;
