pub mod broadcast_reload;

pub use broadcast_reload::BroadcastReloadSignal;
