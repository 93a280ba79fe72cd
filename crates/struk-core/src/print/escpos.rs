//! Minimal ESC/POS command stream for 58 mm thermal printers.

const ESC: u8 = 0x1B;
const GS: u8 = 0x1D;
const LF: u8 = 0x0A;

/// Initialize printer.
pub const INIT: [u8; 2] = [ESC, b'@'];
/// Feed three lines so the last text clears the cutter.
pub const FEED: [u8; 3] = [ESC, b'd', 3];
/// Partial cut after feeding.
pub const CUT: [u8; 4] = [GS, b'V', 66, 0];

/// Encode text lines as an ESC/POS stream: initialize, one LF-terminated line
/// each, feed, cut.
///
/// Printers are driven in their default code page, so anything outside
/// printable ASCII is sent as `?`.
pub fn encode<S: AsRef<str>>(lines: &[S]) -> Vec<u8> {
    let text_len: usize = lines.iter().map(|l| l.as_ref().len() + 1).sum();
    let mut out = Vec::with_capacity(INIT.len() + text_len + FEED.len() + CUT.len());

    out.extend_from_slice(&INIT);
    for line in lines {
        out.extend(line.as_ref().chars().map(|c| {
            if c.is_ascii() && !c.is_ascii_control() {
                c as u8
            } else {
                b'?'
            }
        }));
        out.push(LF);
    }
    out.extend_from_slice(&FEED);
    out.extend_from_slice(&CUT);

    out
}
