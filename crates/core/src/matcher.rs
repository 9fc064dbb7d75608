//! Pure path-against-pattern matcher with GitHub-compatible semantics.
//!
//! GitHub evaluates ruleset file patterns with Ruby's
//! `File.fnmatch?(pattern, path, FNM_PATHNAME | FNM_DOTMATCH)`, so this
//! module reproduces that engine rather than reaching for a glob crate:
//! - `*` and `?` never cross a `/` boundary
//! - `**/` at a segment boundary matches zero or more whole directories;
//!   a `**` not followed by `/` collapses to a plain `*`
//! - bracket classes `[...]` support ranges and `!`/`^` negation
//! - wildcards match leading dots (FNM_DOTMATCH)
//! - brace expansion is disabled: `{` is a literal character
//! - `\` escapes the following character
//!
//! The predicate is total: malformed patterns (e.g. an unclosed bracket)
//! simply fail to match.

/// Match a file path against a pattern.
///
/// A single leading `/` is stripped from `file_path` before matching, so
/// `/docs/readme.md` and `docs/readme.md` are equivalent inputs.
pub fn matches(file_path: &str, pattern: &str) -> bool {
    let path = file_path.strip_prefix('/').unwrap_or(file_path);
    let pat: Vec<char> = pattern.chars().collect();
    let s: Vec<char> = path.chars().collect();
    match_pathname(&pat, &s)
}

/// Segment-wise matching loop with `**/` recursion.
///
/// Mirrors the pathname loop of Ruby's `fnmatch`: each iteration matches one
/// path segment, and a `**/` run records a restart point that retries the
/// remaining pattern against each deeper directory level.
fn match_pathname(p: &[char], s: &[char]) -> bool {
    let mut pi = 0;
    let mut si = 0;
    let mut restart: Option<(usize, usize)> = None;

    loop {
        if is_globstar(p, pi) {
            while is_globstar(p, pi) {
                pi += 3;
            }
            restart = Some((pi, si));
        }

        if let Some((np, ns)) = match_segment(p, s, pi, si) {
            let p_more = np < p.len();
            let s_more = ns < s.len();
            if p_more && s_more {
                // both sit on a '/', move to the next segment
                pi = np + 1;
                si = ns + 1;
                continue;
            }
            if !p_more && !s_more {
                return true;
            }
            // one side has segments left over: fall through to the restart
        }

        // retry the post-`**/` pattern one directory level deeper
        if let Some((rp, rs)) = restart {
            let mut k = rs;
            while k < s.len() && s[k] != '/' {
                k += 1;
            }
            if k < s.len() {
                restart = Some((rp, k + 1));
                pi = rp;
                si = k + 1;
                continue;
            }
        }

        return false;
    }
}

fn is_globstar(p: &[char], pi: usize) -> bool {
    pi + 2 < p.len() && p[pi] == '*' && p[pi + 1] == '*' && p[pi + 2] == '/'
}

/// Match a single path segment (both sides bounded by `/` or end of input).
///
/// Returns the positions just past the matched segment on success. `*` is
/// backtracked within the segment only, so it can never swallow a `/`.
fn match_segment(p: &[char], s: &[char], start_p: usize, start_s: usize) -> Option<(usize, usize)> {
    let mut pi = start_p;
    let mut si = start_s;
    let mut star: Option<(usize, usize)> = None;

    loop {
        let p_end = pi >= p.len() || p[pi] == '/';
        let s_end = si >= s.len() || s[si] == '/';

        if p_end {
            if s_end {
                return Some((pi, si));
            }
        } else {
            match p[pi] {
                '*' => {
                    // consecutive stars collapse; a mid-segment `**` is `*`
                    while pi < p.len() && p[pi] == '*' {
                        pi += 1;
                    }
                    star = Some((pi, si));
                    continue;
                }
                '?' => {
                    if !s_end {
                        pi += 1;
                        si += 1;
                        continue;
                    }
                }
                '[' => {
                    if !s_end {
                        if let Some(np) = match_bracket(p, pi + 1, s[si]) {
                            pi = np;
                            si += 1;
                            continue;
                        }
                    }
                }
                '\\' => {
                    if !s_end {
                        // a trailing backslash matches a literal backslash
                        let want = if pi + 1 < p.len() { p[pi + 1] } else { '\\' };
                        if s[si] == want {
                            pi += if pi + 1 < p.len() { 2 } else { 1 };
                            si += 1;
                            continue;
                        }
                    }
                }
                c => {
                    if !s_end && s[si] == c {
                        pi += 1;
                        si += 1;
                        continue;
                    }
                }
            }
        }

        // mismatch: resume from the last star, consuming one more character
        match star {
            Some((sp, ss)) if ss < s.len() && s[ss] != '/' => {
                star = Some((sp, ss + 1));
                pi = sp;
                si = ss + 1;
            }
            _ => return None,
        }
    }
}

/// Match `c` against the bracket class starting just past the `[`.
///
/// Returns the index past the closing `]` when the class matches. An
/// unclosed class matches nothing.
fn match_bracket(p: &[char], mut pi: usize, c: char) -> Option<usize> {
    let mut negated = false;
    if pi < p.len() && (p[pi] == '!' || p[pi] == '^') {
        negated = true;
        pi += 1;
    }

    let mut matched = false;
    while pi < p.len() && p[pi] != ']' {
        let lo = read_class_char(p, &mut pi)?;
        if pi + 1 < p.len() && p[pi] == '-' && p[pi + 1] != ']' {
            pi += 1;
            let hi = read_class_char(p, &mut pi)?;
            if lo <= c && c <= hi {
                matched = true;
            }
        } else if c == lo {
            matched = true;
        }
    }

    if pi >= p.len() {
        return None; // unclosed class
    }
    if matched != negated {
        Some(pi + 1)
    } else {
        None
    }
}

/// Read one class member, honoring `\` escapes.
fn read_class_char(p: &[char], pi: &mut usize) -> Option<char> {
    let mut ch = p[*pi];
    if ch == '\\' {
        *pi += 1;
        if *pi >= p.len() {
            return None;
        }
        ch = p[*pi];
    }
    *pi += 1;
    Some(ch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_literal_paths() {
        assert!(matches("docs/readme.md", "docs/readme.md"));
        assert!(matches("a/b/c", "a/b/c"));
        assert!(!matches("a/b/c", "a/b"));
        assert!(!matches("a/b", "a/b/c"));
        assert!(!matches("docs/readme.md", "docs/readme.txt"));
    }

    #[test]
    fn star_stays_within_segment() {
        assert!(matches("src/main.rs", "src/*.rs"));
        assert!(matches("src/main.rs", "src/*"));
        assert!(!matches("src/a/b.rs", "src/*.rs"));
        assert!(!matches("a/b", "*"));
        assert!(matches("readme.md", "*"));
        assert!(matches("foo", "f*o"));
        assert!(!matches("foo", "b*"));
    }

    #[test]
    fn question_mark_single_char_no_slash() {
        assert!(matches("docs/a.md", "docs/?.md"));
        assert!(!matches("docs/ab.md", "docs/?.md"));
        assert!(!matches("a/b", "a?b"));
    }

    #[test]
    fn bracket_classes() {
        assert!(matches("src/a.rs", "src/[abc].rs"));
        assert!(!matches("src/d.rs", "src/[abc].rs"));
        assert!(matches("src/d.rs", "src/[!abc].rs"));
        assert!(!matches("src/a.rs", "src/[!abc].rs"));
        assert!(matches("file5.txt", "file[0-9].txt"));
        assert!(!matches("filex.txt", "file[0-9].txt"));
        assert!(matches("a-b", "a[x-]b"));
    }

    #[test]
    fn malformed_patterns_never_match() {
        assert!(!matches("docs/a", "docs/[abc"));
        assert!(!matches("[", "["));
        assert!(!matches("a", "[a"));
    }

    #[test]
    fn leading_slash_is_stripped_once() {
        assert!(matches("/docs/readme.md", "docs/*"));
        assert!(matches("/docs/readme.md", "docs/readme.md"));
        assert!(!matches("//docs/readme.md", "docs/readme.md"));
    }

    #[test]
    fn dotfiles_are_matched_by_wildcards() {
        assert!(matches(".github", "*"));
        assert!(matches("docs/.hidden", "docs/*"));
        assert!(matches(".areas/docs.yml", "*/docs.yml"));
        assert!(matches("docs/.env", "docs/?env"));
    }

    #[test]
    fn braces_are_literal() {
        assert!(!matches("docs/a.md", "docs/{a,b}.md"));
        assert!(matches("docs/{a,b}.md", "docs/{a,b}.md"));
    }

    #[test]
    fn globstar_segment_prefix_recurses() {
        assert!(matches("foo.md", "**/foo.md"));
        assert!(matches("a/foo.md", "**/foo.md"));
        assert!(matches("a/b/c/foo.md", "**/foo.md"));
        assert!(matches("docs/c.md", "docs/**/*.md"));
        assert!(matches("docs/a/b/c.md", "docs/**/*.md"));
        assert!(!matches("src/a/b/c.md", "docs/**/*.md"));
    }

    #[test]
    fn trailing_globstar_is_single_segment() {
        // Ruby fnmatch: a `**` not followed by `/` behaves like `*`
        assert!(matches("docs/readme.md", "docs/**"));
        assert!(!matches("docs/a/b.md", "docs/**"));
    }

    #[test]
    fn escapes_disable_wildcards() {
        assert!(matches("docs/*.md", "docs/\\*.md"));
        assert!(!matches("docs/a.md", "docs/\\*.md"));
        assert!(matches("a\\", "a\\"));
    }

    #[test]
    fn trailing_or_missing_separators_do_not_match() {
        assert!(!matches("docs", "docs/"));
        assert!(!matches("docs/", "docs"));
        assert!(matches("docs/", "docs/"));
    }
}
