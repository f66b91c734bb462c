//! End-to-end tests running hand-assembled programs through the interpreter


mod arithmetic;
mod functions;
mod strings;
