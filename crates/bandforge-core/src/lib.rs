pub mod algebra;
pub mod bands;
pub mod composite;
pub mod consts;
pub mod error;
pub mod io;
pub mod ledger;
pub mod normalize;
pub mod pipeline;
pub mod raster;
pub mod threshold;
