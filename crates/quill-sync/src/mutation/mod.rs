mod entity;
pub use self::entity::*;
mod mutation_seq;
pub use self::mutation_seq::*;
mod mutation_error;
pub use self::mutation_error::*;
mod mutation_event;
pub use self::mutation_event::*;
mod mutation_store;
pub use self::mutation_store::*;
mod coordinator_config;
pub use self::coordinator_config::*;
mod coordinator;
pub use self::coordinator::*;

mod entity_map;
pub use self::entity_map::*;
mod entity_list;
pub use self::entity_list::*;
