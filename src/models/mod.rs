pub mod enrollment;
pub mod field;
pub mod room;

pub use enrollment::{parse_enrollment_code, DecResponse, EnrollmentResult};
pub use field::FieldValue;
pub use room::{parse_room_list, Room, ROOM_LIST_KEYS, UNKNOWN_ROOM_NAME};
