/// Run configuration handed from the binary to [`crate::run`].
///
/// Images are loaded in order into the same address space, so later images
/// overwrite earlier ones where they overlap.
#[derive(Debug, PartialEq)]
pub struct Config {
    pub image_paths: Vec<String>,
    pub debug: bool,
}
