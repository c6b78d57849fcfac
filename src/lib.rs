pub mod comb;
pub mod display;
pub mod emitter;
pub mod engine;
pub mod event;
pub mod shell;
pub mod source;
pub mod tempo;

// Sample level support for the sox backend
pub mod oscillator;
pub mod wave;
