mod cleanup_tests;
mod key_manager_tests;
mod signer_tests;
mod support;
