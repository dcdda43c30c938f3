//! Paired combine of two fallible streams.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::stream::{BoxStream, Stream, StreamExt};

/// Joins two result streams pairwise.
///
/// A combined value is produced only once both sources have emitted since
/// the previous pair. The first error from either side ends the stream with
/// that error; a side completing with no buffered value ends the stream.
/// Dropping the `Zip` drops both sources, cancelling whatever work they had
/// in flight.
pub struct Zip<A, B, E> {
    left: BoxStream<'static, Result<A, E>>,
    right: BoxStream<'static, Result<B, E>>,
    buffered_left: Option<A>,
    buffered_right: Option<B>,
    left_done: bool,
    right_done: bool,
    finished: bool,
}

// Sound: no field is pinned through self — the sources are boxed and the
// buffers are plain values.
impl<A, B, E> Unpin for Zip<A, B, E> {}

impl<A, B, E> Zip<A, B, E> {
    pub fn new(
        left: impl Stream<Item = Result<A, E>> + Send + 'static,
        right: impl Stream<Item = Result<B, E>> + Send + 'static,
    ) -> Self {
        Self {
            left: left.boxed(),
            right: right.boxed(),
            buffered_left: None,
            buffered_right: None,
            left_done: false,
            right_done: false,
            finished: false,
        }
    }
}

impl<A, B, E> Stream for Zip<A, B, E> {
    type Item = Result<(A, B), E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.finished {
            return Poll::Ready(None);
        }

        if this.buffered_left.is_none() && !this.left_done {
            match this.left.poll_next_unpin(cx) {
                Poll::Ready(Some(Ok(value))) => this.buffered_left = Some(value),
                Poll::Ready(Some(Err(err))) => {
                    this.finished = true;
                    return Poll::Ready(Some(Err(err)));
                }
                Poll::Ready(None) => this.left_done = true,
                Poll::Pending => {}
            }
        }

        if this.buffered_right.is_none() && !this.right_done {
            match this.right.poll_next_unpin(cx) {
                Poll::Ready(Some(Ok(value))) => this.buffered_right = Some(value),
                Poll::Ready(Some(Err(err))) => {
                    this.finished = true;
                    return Poll::Ready(Some(Err(err)));
                }
                Poll::Ready(None) => this.right_done = true,
                Poll::Pending => {}
            }
        }

        if this.buffered_left.is_some() && this.buffered_right.is_some() {
            if let Some(pair) = this.buffered_left.take().zip(this.buffered_right.take()) {
                return Poll::Ready(Some(Ok(pair)));
            }
        }

        // A side that ended with nothing buffered can never form a pair.
        if (this.left_done && this.buffered_left.is_none())
            || (this.right_done && this.buffered_right.is_none())
        {
            this.finished = true;
            return Poll::Ready(None);
        }

        Poll::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn ok_stream<T: Send + 'static>(
        values: Vec<T>,
    ) -> impl Stream<Item = Result<T, String>> + Send + 'static {
        stream::iter(values.into_iter().map(Ok))
    }

    #[tokio::test]
    async fn pairs_values_from_both_sides() {
        let mut zipped = Zip::new(ok_stream(vec![1, 2]), ok_stream(vec!["a", "b"]));
        assert_eq!(zipped.next().await, Some(Ok((1, "a"))));
        assert_eq!(zipped.next().await, Some(Ok((2, "b"))));
        assert_eq!(zipped.next().await, None);
    }

    #[tokio::test]
    async fn ends_when_the_shorter_side_ends() {
        let mut zipped = Zip::new(ok_stream(vec![1]), ok_stream(vec!["a", "b", "c"]));
        assert_eq!(zipped.next().await, Some(Ok((1, "a"))));
        assert_eq!(zipped.next().await, None);
        // Fused after the end.
        assert_eq!(zipped.next().await, None);
    }

    #[tokio::test]
    async fn propagates_error_before_the_other_side_emits() {
        let left = stream::pending::<Result<u8, String>>();
        let right = stream::iter(vec![Err::<u8, _>("boom".to_string())]);

        let mut zipped = Zip::new(left, right);
        assert_eq!(zipped.next().await, Some(Err("boom".to_string())));
        assert_eq!(zipped.next().await, None);
    }

    #[tokio::test]
    async fn error_wins_over_a_buffered_value() {
        let left = ok_stream(vec![1]);
        let right = stream::iter(vec![Err::<u8, _>("late".to_string())]);

        let mut zipped = Zip::new(left, right);
        assert_eq!(zipped.next().await, Some(Err("late".to_string())));
    }

    #[tokio::test]
    async fn empty_side_yields_no_pairs() {
        let mut zipped = Zip::new(ok_stream(Vec::<u8>::new()), ok_stream(vec!["a"]));
        assert_eq!(zipped.next().await, None);
    }
}
