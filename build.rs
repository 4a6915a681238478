fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Point prost/tonic at a protoc binary. Prefer an explicitly configured
    // one, otherwise fall back to the vendored binary so the build works on
    // hosts without a system protoc.
    if std::env::var_os("PROTOC").is_none() {
        if let Ok(path) = protoc_bin_vendored::protoc_bin_path() {
            std::env::set_var("PROTOC", path);
        }
    }
    tonic_build::compile_protos("proto/fire_opt.proto")?;
    Ok(())
}
