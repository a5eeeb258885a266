use std::env;
use std::path::PathBuf;

fn fallback_dotenv_path(pf_home: Option<PathBuf>, home_dir: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(base) = pf_home {
        return Some(base.join(".env"));
    }
    Some(home_dir?.join(".pf-periods").join(".env"))
}

pub fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    let fallback = fallback_dotenv_path(env::var_os("PF_HOME").map(PathBuf::from), dirs::home_dir());

    let Some(path) = fallback else {
        return;
    };
    if path.is_file() {
        let _ = dotenvy::from_path(&path);
    }
}

#[cfg(test)]
mod tests {
    use super::fallback_dotenv_path;
    use std::path::PathBuf;

    #[test]
    fn fallback_prefers_pf_home() {
        let got = fallback_dotenv_path(
            Some(PathBuf::from("/workspace/pf")),
            Some(PathBuf::from("/home/alice")),
        );

        let want = Some(PathBuf::from("/workspace/pf/.env"));
        assert_eq!(got, want);
    }

    #[test]
    fn fallback_uses_home_dot_dir_when_pf_home_unset() {
        let got = fallback_dotenv_path(None, Some(PathBuf::from("/home/alice")));
        let want = Some(PathBuf::from("/home/alice/.pf-periods/.env"));
        assert_eq!(got, want);
    }
}
