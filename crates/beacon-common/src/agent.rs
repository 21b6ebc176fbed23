//! Agent attribution for instrumented calls.
//!
//! The client attributes LLM calls to the agent that made them. Call sites
//! cannot be asked to thread an agent id through every layer, so
//! instrumentation enters an [`AgentScope`] when an agent starts handling
//! work; [`current_agent_id`] later scans the innermost scopes of the
//! current thread for the owning agent. A [boundary](AgentScope::boundary)
//! scope marks the program entry point and stops the scan, so ids never
//! leak across it.
//!
//! Scopes are thread-local: a scope entered on one thread is invisible to
//! every other thread, and the guard must be dropped on the thread that
//! created it.

use std::cell::RefCell;
use std::marker::PhantomData;

use tracing::debug;
use uuid::Uuid;

thread_local! {
    static AGENT_STACK: RefCell<Vec<AgentFrame>> = const { RefCell::new(Vec::new()) };
}

#[derive(Debug, Clone)]
enum AgentFrame {
    Agent { id: Uuid, name: Option<String> },
    Boundary,
}

/// RAII guard for one level of agent attribution. Pops its frame on drop.
#[derive(Debug)]
pub struct AgentScope {
    // Tied to the thread that entered the scope.
    _not_send: PhantomData<*const ()>,
}

impl AgentScope {
    /// Attribute subsequent calls on this thread to `id` until the guard
    /// drops.
    pub fn enter(id: Uuid, name: Option<&str>) -> Self {
        Self::push(AgentFrame::Agent {
            id,
            name: name.map(str::to_string),
        })
    }

    /// Mark the program entry point: [`current_agent_id`] stops scanning
    /// here instead of looking further out.
    pub fn boundary() -> Self {
        Self::push(AgentFrame::Boundary)
    }

    fn push(frame: AgentFrame) -> Self {
        AGENT_STACK.with(|stack| stack.borrow_mut().push(frame));
        AgentScope {
            _not_send: PhantomData,
        }
    }
}

impl Drop for AgentScope {
    fn drop(&mut self) {
        AGENT_STACK.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/// Id of the innermost agent scope on this thread, or `None` when no agent
/// is active. Nil ids are skipped; the scan stops early at a boundary
/// scope.
pub fn current_agent_id() -> Option<Uuid> {
    AGENT_STACK.with(|stack| {
        for frame in stack.borrow().iter().rev() {
            match frame {
                AgentFrame::Boundary => return None,
                AgentFrame::Agent { id, .. } if id.is_nil() => continue,
                AgentFrame::Agent { id, name } => {
                    if let Some(name) = name {
                        debug!(agent = %name, "call attributed to agent");
                    }
                    return Some(*id);
                }
            }
        }
        None
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_scope_means_no_agent() {
        assert_eq!(current_agent_id(), None);
    }

    #[test]
    fn innermost_scope_wins() {
        let outer_id = Uuid::new_v4();
        let inner_id = Uuid::new_v4();

        let _outer = AgentScope::enter(outer_id, Some("planner"));
        assert_eq!(current_agent_id(), Some(outer_id));

        {
            let _inner = AgentScope::enter(inner_id, Some("executor"));
            assert_eq!(current_agent_id(), Some(inner_id));
        }

        // Inner guard dropped; attribution falls back to the outer agent
        assert_eq!(current_agent_id(), Some(outer_id));
    }

    #[test]
    fn nil_ids_are_skipped() {
        let real = Uuid::new_v4();
        let _outer = AgentScope::enter(real, None);
        let _inner = AgentScope::enter(Uuid::nil(), None);
        assert_eq!(current_agent_id(), Some(real));
    }

    #[test]
    fn boundary_stops_the_scan() {
        let outside = Uuid::new_v4();
        let _outer = AgentScope::enter(outside, Some("outer"));
        let _boundary = AgentScope::boundary();
        assert_eq!(current_agent_id(), None);
    }

    #[test]
    fn scopes_are_thread_local() {
        let id = Uuid::new_v4();
        let _scope = AgentScope::enter(id, None);
        let seen = std::thread::spawn(current_agent_id).join().unwrap();
        assert_eq!(seen, None);
    }
}
