pub mod confirmed;
pub mod pdu;
pub mod unconfirmed;

pub use confirmed::{
    AbortPdu, ComplexAckHeader, ConfirmedRequestHeader, ErrorPdu, RejectPdu, SimpleAck,
};
pub use pdu::ApduType;
pub use unconfirmed::UnconfirmedRequestHeader;
