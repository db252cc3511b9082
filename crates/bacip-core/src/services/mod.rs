pub mod cov_notification;
pub mod i_am;
pub mod read_property;
pub mod read_property_multiple;
pub mod subscribe_cov;
pub mod value_codec;
pub mod who_is;
