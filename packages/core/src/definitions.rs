mod command_classes;
pub use command_classes::*;

mod device_class;
pub use device_class::*;

mod function_type;
pub use function_type::*;

mod genre;
pub use genre::*;

mod home_id;
pub use home_id::*;

mod node_id;
pub use node_id::*;

mod node_info;
pub use node_info::*;

mod query_stage;
pub use query_stage::*;

mod value_type;
pub use value_type::*;

mod version;
pub use version::*;

mod wakeup_reason;
pub use wakeup_reason::*;
