pub mod quiz_factory;
