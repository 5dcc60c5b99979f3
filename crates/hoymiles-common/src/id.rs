/// Short hex identifier suitable for namespacing element ids. Used when
/// the configured `ident` is empty and the host has to assign one.
pub fn new_ident() -> String {
    let uuid = uuid::Uuid::new_v4();
    let bytes = uuid.as_bytes();
    format!(
        "{:02x}{:02x}{:02x}{:02x}",
        bytes[0], bytes[1], bytes[2], bytes[3]
    )
}
