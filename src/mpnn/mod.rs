mod cell;
mod conv;
mod network;
mod readout;

pub use cell::{GruCell, GruCellConfig, LstmCell, LstmCellConfig, LstmCellState};
pub use conv::{NnConv, NnConvConfig};
pub use network::{MpnnPredictor, MpnnPredictorConfig};
pub use readout::{Set2Set, Set2SetConfig};
