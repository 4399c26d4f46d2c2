pub mod ast;
pub mod callable;
pub mod class;
pub mod environment;
pub mod error;
pub mod function;
pub mod interpreter;
pub mod parser;
pub mod resolver;
pub mod runner;
pub mod scanner;
pub mod token;
pub mod value;
