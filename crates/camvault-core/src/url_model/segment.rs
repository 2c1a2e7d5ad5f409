//! Manifest URI → segment URI rewriting.

/// Manifest file names the media endpoint is known to serve.
pub const MANIFEST_FILE_NAMES: [&str; 2] = ["clip.mpd", "file.mpd"];

/// Points `manifest_uri` at `segment_file_name` by replacing the manifest
/// file name in the path. Scheme, authority, directories, query and fragment
/// are kept byte-for-byte.
///
/// Returns `None` when the URI is not absolute or its path does not end in a
/// recognized manifest file name.
pub fn segment_uri(manifest_uri: &str, segment_file_name: &str) -> Option<String> {
    url::Url::parse(manifest_uri).ok()?;

    let path_end = manifest_uri
        .find(|c| c == '?' || c == '#')
        .unwrap_or(manifest_uri.len());
    let (path, rest) = manifest_uri.split_at(path_end);

    let dir_end = path.rfind('/')? + 1;
    let file_name = &path[dir_end..];
    if !MANIFEST_FILE_NAMES.contains(&file_name) {
        return None;
    }

    let mut out = String::with_capacity(manifest_uri.len() + segment_file_name.len());
    out.push_str(&path[..dir_end]);
    out.push_str(segment_file_name);
    out.push_str(rest);
    Some(out)
}
