pub mod codec;
pub mod command;
pub mod command_meta;
mod command_table;
pub mod model;
pub mod packet;
pub mod response;

pub use codec::PacketCodec;
pub use command::Command;
pub use command_meta::{CommandGroup, CommandMeta, CommandRegistry, ResponseMap, registry};
pub use model::{JvcModel, model, model_from_status_payload, models};
pub use packet::{CommandCode, Packet, PacketType};
pub use response::Response;
