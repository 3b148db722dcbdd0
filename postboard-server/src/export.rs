//! Post export - stream every populated post into a text file
//!
//! One line per post, written in cursor order as each document arrives:
//!
//! ```text
//! Title: <title>, Author: <author name>
//! ```
//!
//! Nothing is rolled back on failure. Lines written before the error stay in
//! the file.

use std::path::{Path, PathBuf};

use bson::oid::ObjectId;
use futures::TryStreamExt;
use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};

use crate::db::{DbError, PostRepo, PostStream, Store};
use crate::models::PopulatedPost;

/// Default export destination, relative to the working directory
pub const DEFAULT_EXPORT_PATH: &str = "posts.txt";

/// Export error type
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The post's author reference points at no user, so there is no name to write.
    #[error("post {post_id} has no resolvable author")]
    MissingAuthor { post_id: ObjectId },
}

/// Summary of a finished export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub path: PathBuf,
    pub lines: u64,
}

impl ExportReport {
    /// Confirmation text returned to the caller.
    pub fn message(&self) -> String {
        format!("Export finished, file saved as {}", self.path.display())
    }
}

/// Format one export line, including the trailing newline.
pub fn format_line(post: &PopulatedPost) -> Result<String, ExportError> {
    let author = post
        .author_name()
        .ok_or(ExportError::MissingAuthor { post_id: post.id })?;
    Ok(format!("Title: {}, Author: {}\n", post.title, author))
}

/// Drain `posts` into `out`, one line per post. Returns the number of lines.
pub async fn write_posts<W>(mut posts: PostStream, out: &mut W) -> Result<u64, ExportError>
where
    W: AsyncWrite + Unpin,
{
    let mut lines = 0;
    while let Some(post) = posts.try_next().await? {
        out.write_all(format_line(&post)?.as_bytes()).await?;
        lines += 1;
    }
    out.flush().await?;
    Ok(lines)
}

/// Write every post, then shut `out` down even if writing failed.
///
/// The first error wins: a write or cursor failure is reported over a
/// failure to close the sink afterwards.
pub async fn write_and_close<W>(posts: PostStream, mut out: W) -> Result<u64, ExportError>
where
    W: AsyncWrite + Unpin,
{
    let written = write_posts(posts, &mut out).await;
    let closed = out.shutdown().await;
    let lines = written?;
    closed?;
    Ok(lines)
}

/// Export every post to `path`, creating or truncating it.
pub async fn export_posts(store: &dyn Store, path: &Path) -> Result<ExportReport, ExportError> {
    let posts = PostRepo::new(store).cursor().await?;
    let file = File::create(path).await?;
    let lines = write_and_close(posts, BufWriter::new(file)).await?;

    tracing::info!(path = %path.display(), lines, "export finished");
    Ok(ExportReport {
        path: path.to_path_buf(),
        lines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::{AuthorName, NewPost, NewUser};
    use futures::stream::{self, StreamExt};
    use std::io;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    /// Sink that accepts writes but fails to close
    struct UnclosableSink(Vec<u8>);

    impl AsyncWrite for UnclosableSink {
        fn poll_write(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &[u8],
        ) -> Poll<io::Result<usize>> {
            self.0.extend_from_slice(buf);
            Poll::Ready(Ok(buf.len()))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Err(io::Error::new(io::ErrorKind::Other, "close failed")))
        }
    }

    fn populated(title: &str, author: Option<&str>) -> PopulatedPost {
        PopulatedPost {
            id: ObjectId::new(),
            title: title.into(),
            content: "body".into(),
            author: author.map(|name| AuthorName { name: name.into() }),
        }
    }

    #[test]
    fn line_format() {
        let line = format_line(&populated("Hi", Some("Ana"))).unwrap();
        assert_eq!(line, "Title: Hi, Author: Ana\n");
    }

    #[test]
    fn dangling_author_is_an_error() {
        let post = populated("Hi", None);
        let err = format_line(&post).unwrap_err();
        assert!(matches!(err, ExportError::MissingAuthor { post_id } if post_id == post.id));
    }

    #[tokio::test]
    async fn writes_lines_in_stream_order() {
        let posts = vec![
            Ok(populated("one", Some("Ana"))),
            Ok(populated("two", Some("Bo"))),
        ];
        let mut out = Vec::new();

        let lines = write_posts(stream::iter(posts).boxed(), &mut out)
            .await
            .unwrap();

        assert_eq!(lines, 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Title: one, Author: Ana\nTitle: two, Author: Bo\n"
        );
    }

    #[tokio::test]
    async fn keeps_partial_output_on_failure() {
        let posts = vec![
            Ok(populated("one", Some("Ana"))),
            Ok(populated("orphan", None)),
            Ok(populated("three", Some("Bo"))),
        ];
        let mut out = Vec::new();

        let err = write_posts(stream::iter(posts).boxed(), &mut out)
            .await
            .unwrap_err();

        assert!(matches!(err, ExportError::MissingAuthor { .. }));
        assert_eq!(String::from_utf8(out).unwrap(), "Title: one, Author: Ana\n");
    }

    #[tokio::test]
    async fn write_error_takes_precedence_over_close_error() {
        let posts = vec![
            Ok(populated("one", Some("Ana"))),
            Ok(populated("orphan", None)),
        ];

        let err = write_and_close(stream::iter(posts).boxed(), UnclosableSink(Vec::new()))
            .await
            .unwrap_err();

        assert!(matches!(err, ExportError::MissingAuthor { .. }), "{err}");
    }

    #[tokio::test]
    async fn close_error_reported_when_writes_succeed() {
        let posts = vec![Ok(populated("one", Some("Ana")))];

        let err = write_and_close(stream::iter(posts).boxed(), UnclosableSink(Vec::new()))
            .await
            .unwrap_err();

        assert!(matches!(err, ExportError::Io(ref e) if e.to_string() == "close failed"));
    }

    #[tokio::test]
    async fn export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_EXPORT_PATH);
        std::fs::write(&path, "stale contents\n").unwrap();

        let store = MemoryStore::new();
        let ana = store
            .insert_user(NewUser::new(Some("Ana".into()), Some("ana@x.com".into())).unwrap())
            .await
            .unwrap();
        store
            .insert_post(NewPost {
                title: "Hi".into(),
                content: "World".into(),
                author: ana.id,
            })
            .await
            .unwrap();

        let report = export_posts(&store, &path).await.unwrap();

        assert_eq!(report.lines, 1);
        assert_eq!(
            report.message(),
            format!("Export finished, file saved as {}", path.display())
        );
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "Title: Hi, Author: Ana\n"
        );
    }

    #[test]
    fn default_message() {
        let report = ExportReport {
            path: PathBuf::from(DEFAULT_EXPORT_PATH),
            lines: 0,
        };
        assert_eq!(report.message(), "Export finished, file saved as posts.txt");
    }
}
