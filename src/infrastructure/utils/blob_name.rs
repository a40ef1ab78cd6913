use chrono::Utc;
use rand::Rng;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const TOKEN_LEN: usize = 11;

/// `{random base36 token}-{unix millis}.{extension}`
pub fn generate_blob_name(extension: &str) -> String {
    let mut rng = rand::thread_rng();
    let token: String = (0..TOKEN_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();

    format!("{}-{}.{}", token, Utc::now().timestamp_millis(), extension)
}

/// Object name from a public URL: its last path segment, without query or fragment.
pub fn blob_name_from_url(public_url: &str) -> Option<String> {
    let path = match url::Url::parse(public_url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => public_url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    };

    let name = path.rsplit('/').next().unwrap_or_default();
    if name.is_empty() {
        return None;
    }

    Some(
        urlencoding::decode(name)
            .map(|decoded| decoded.into_owned())
            .unwrap_or_else(|_| name.to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_names_are_unique_and_shaped() {
        let first = generate_blob_name("jpg");
        let second = generate_blob_name("jpg");

        assert_ne!(first, second);
        assert!(first.ends_with(".jpg"));

        let (token, rest) = first.split_once('-').unwrap();
        assert_eq!(token.len(), TOKEN_LEN);
        assert!(token.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
        assert!(rest.trim_end_matches(".jpg").parse::<i64>().is_ok());
    }

    #[test]
    fn extracts_last_segment() {
        assert_eq!(
            blob_name_from_url("https://x.supabase.co/storage/v1/object/public/events-images/abc-1.jpg"),
            Some("abc-1.jpg".to_string())
        );
        assert_eq!(
            blob_name_from_url("https://cdn.example/p/clip%20one.mp4?v=2"),
            Some("clip one.mp4".to_string())
        );
        assert_eq!(blob_name_from_url("https://cdn.example/"), None);
    }
}
