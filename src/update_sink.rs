use crate::Result;
use crate::session::SyncUpdate;

/// Consumer of engine output.
///
/// The session returns [`SyncUpdate`]s synchronously; a sink is the seam for
/// streaming them somewhere else (a renderer bridge, a log, the CLI's
/// stdout).
pub trait UpdateSink {
    fn emit(&mut self, update: &SyncUpdate) -> Result<()>;
    fn close(&mut self) -> Result<()>;
}
