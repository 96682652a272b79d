mod common;
mod controller;
