pub mod slingshot;
