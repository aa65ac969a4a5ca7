use parley_types::{Message, Thread, ThreadId, Workspace, WorkspaceId};

/// In-memory owner of every workspace and its threads.
///
/// Ordering is insertion order. Nothing is ever removed.
#[derive(Debug, Default, Clone)]
pub struct WorkspaceManager {
    workspaces: Vec<Workspace>,
}

impl WorkspaceManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a workspace with default name, model and settings
    pub fn create_workspace(&mut self) -> &Workspace {
        let workspace = Workspace::new();
        tracing::debug!(workspace_id = %workspace.id, "Created workspace");
        self.workspaces.push(workspace);
        &self.workspaces[self.workspaces.len() - 1]
    }

    /// Append a thread carrying the workspace's current model.
    /// Unknown workspace ids change nothing.
    pub fn create_thread(&mut self, workspace_id: WorkspaceId) -> Option<&Thread> {
        let workspace = self.workspace_mut(workspace_id)?;
        let thread = Thread::new(workspace.model.clone());
        tracing::debug!(%workspace_id, thread_id = %thread.id, "Created thread");
        workspace.threads.push(thread);
        workspace.threads.last()
    }

    /// Set the workspace model and rewrite the model snapshot of every thread
    /// it owns. Returns false for an unknown id.
    pub fn change_workspace_model(&mut self, workspace_id: WorkspaceId, model: &str) -> bool {
        let Some(workspace) = self.workspace_mut(workspace_id) else {
            return false;
        };

        workspace.model = model.to_string();
        for thread in &mut workspace.threads {
            thread.workspace_model = Some(model.to_string());
        }
        tracing::debug!(%workspace_id, model, threads = workspace.threads.len(), "Workspace model changed");
        true
    }

    pub fn workspaces(&self) -> &[Workspace] {
        &self.workspaces
    }

    pub fn workspace(&self, workspace_id: WorkspaceId) -> Option<&Workspace> {
        self.workspaces.iter().find(|w| w.id == workspace_id)
    }

    fn workspace_mut(&mut self, workspace_id: WorkspaceId) -> Option<&mut Workspace> {
        self.workspaces.iter_mut().find(|w| w.id == workspace_id)
    }

    /// Find a thread in any workspace
    pub fn thread(&self, thread_id: ThreadId) -> Option<&Thread> {
        self.workspaces.iter().find_map(|w| w.thread(thread_id))
    }

    fn thread_mut(&mut self, thread_id: ThreadId) -> Option<&mut Thread> {
        self.workspaces
            .iter_mut()
            .find_map(|w| w.thread_mut(thread_id))
    }

    /// Append to a thread's history. Returns false if the thread is gone.
    pub fn append_message(&mut self, thread_id: ThreadId, message: Message) -> bool {
        match self.thread_mut(thread_id) {
            Some(thread) => {
                thread.push(message);
                true
            }
            None => false,
        }
    }
}
