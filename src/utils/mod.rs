use url::Url;

/// Replace every character that is not alphanumeric, space, hyphen,
/// underscore or dot with an underscore
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| match c {
            ' ' | '-' | '_' | '.' => c,
            c if c.is_alphanumeric() => c,
            _ => '_',
        })
        .collect()
}

/// Short name of where a URL points to, for log lines
pub fn source_host(input: &str) -> Option<String> {
    Url::parse(input)
        .ok()?
        .host_str()
        .map(|host| host.trim_start_matches("www.").to_string())
}
