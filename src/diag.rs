/// Best-effort text channel for human-readable status lines.
///
/// The logger hands each line over fully formed, CRLF terminator included.
/// Delivery is fire-and-forget: a sink that cannot transmit drops the line,
/// and the core never reads anything back.
pub trait DiagnosticSink {
    fn write_line(&mut self, line: &str);
}

/// Discards every line.
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn write_line(&mut self, _line: &str) {}
}

/// Adapts any [`core::fmt::Write`] implementor (a HAL UART transmitter,
/// typically) into a sink.
pub struct FmtSink<W>(pub W);

impl<W: core::fmt::Write> DiagnosticSink for FmtSink<W> {
    fn write_line(&mut self, line: &str) {
        let _ = self.0.write_str(line);
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn write_line(&mut self, line: &str) {
        (**self).write_line(line)
    }
}
