use std::ops::Deref;
use std::fmt;
use source_span::{Position, Span};

/**
 * Wrap a value to give it a location.
 *
 * Two located values are equal when their contents are equal, whatever their spans.
 */
#[derive(Clone)]
pub struct Located<T> {
	t: T,
	span: Span
}

/// Span covering nothing, at the very beginning of the input.
pub fn nowhere() -> Span {
	Position::new(0, 0).into()
}

/// Format a span the way diagnostics print it (`line:column`, 1-based).
pub fn format_span(span: Span) -> String {
	let start = span.start();
	format!("{}:{}", start.line+1, start.column+1)
}

impl<T> Located<T> {
	pub fn new(t: T, span: Span) -> Located<T> {
		Located {
			t: t,
			span: span
		}
	}

	/// Wrap a value that does not come from any parsed input.
	pub fn unlocated(t: T) -> Located<T> {
		Self::new(t, nowhere())
	}

	pub fn span(&self) -> Span {
		self.span
	}

	pub fn into_inner(self) -> T {
		self.t
	}

	pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Located<U> {
		Located {
			t: f(self.t),
			span: self.span
		}
	}
}

impl<T> Deref for Located<T> {
	type Target = T;

	fn deref(&self) -> &T {
		&self.t
	}
}

impl<T> AsRef<T> for Located<T> {
	fn as_ref(&self) -> &T {
		&self.t
	}
}

impl<T> AsMut<T> for Located<T> {
	fn as_mut(&mut self) -> &mut T {
		&mut self.t
	}
}

impl<T: PartialEq> PartialEq for Located<T> {
	fn eq(&self, other: &Located<T>) -> bool {
		self.t == other.t
	}
}

impl<T: Eq> Eq for Located<T> {}

impl<T: fmt::Display> fmt::Display for Located<T> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		self.t.fmt(f)
	}
}

impl<T: fmt::Debug> fmt::Debug for Located<T> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{:?}@{}", self.t, format_span(self.span))
	}
}

impl<T: std::error::Error> std::error::Error for Located<T> {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		self.t.source()
	}
}
