//! trybuild coverage for `#[ortho_args(crate = "...")]` support.
//!
//! Ensures that the `crate` attribute is accepted by both derives and that
//! generated code compiles when the runtime is reached through another path.

#[test]
fn crate_path_alias_compiles() {
    let t = trybuild::TestCases::new();
    t.pass("tests/trybuild/crate_path_alias.rs");
    t.pass("tests/trybuild/crate_path_alias_renamed.rs");
}
