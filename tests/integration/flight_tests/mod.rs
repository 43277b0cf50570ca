mod config;
mod determinism;
mod halt;
mod hover;
mod plugin;
mod tracking;
