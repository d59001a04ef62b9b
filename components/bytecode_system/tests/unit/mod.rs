//! Unit test runner for bytecode_system

mod test_instruction;
mod test_program;
