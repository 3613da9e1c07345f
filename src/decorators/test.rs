use super::*;
use crate::{
    blackboard::Blackboard,
    leaves::{ContinueNode, FailNode, SuccessNode},
    node::Node,
};

fn decorate(task: impl Task + 'static, child: impl Task + 'static, blackboard: &Blackboard) -> Node {
    let child = Node::with_task("child", child).with_blackboard(blackboard);
    Node::with_task("decorator", task)
        .with_blackboard(blackboard)
        .with_child(child)
        .unwrap()
}

fn child_id(node: &Node) -> crate::blackboard::NodeId {
    node.children()[0].id()
}

#[test]
fn test_negate() {
    let bb = Blackboard::new();
    let mut d = decorate(Negate, FailNode, &bb);
    let result = d.tick().unwrap();
    assert_eq!(result, StatusCode::Success);
    assert_eq!(result.text, "Negating child");

    let mut d = decorate(Negate, SuccessNode, &bb);
    assert_eq!(d.tick().unwrap(), StatusCode::Fail);

    let mut d = decorate(Negate, ContinueNode, &bb);
    assert_eq!(d.tick().unwrap(), StatusCode::Active);
}

#[test]
fn test_negate_cancel() {
    let bb = Blackboard::new();
    let mut d = decorate(Negate, ContinueNode, &bb);
    assert_eq!(d.tick().unwrap(), StatusCode::Active);
    d.cancel().unwrap();
    assert_eq!(*d.result(), StatusCode::Cancel);
    assert_eq!(*d.children()[0].result(), StatusCode::Cancel);
    assert_eq!(d.tick().unwrap(), StatusCode::Cancel);
    assert_eq!(*d.result(), StatusCode::Pending);
    assert_eq!(*d.children()[0].result(), StatusCode::Pending);
}

#[test]
fn test_negate_force() {
    let bb = Blackboard::new();
    let mut d = decorate(Negate, SuccessNode, &bb);
    d.child_mut("child").unwrap().force(StatusCode::Fail);
    assert_eq!(d.tick().unwrap(), StatusCode::Success);

    let mut d = decorate(Negate, FailNode, &bb);
    d.force(StatusCode::Fail);
    assert_eq!(d.tick().unwrap(), StatusCode::Fail);
}

#[test]
fn test_repeat() {
    let bb = Blackboard::new();
    for (child, code) in [
        (Box::new(FailNode) as Box<dyn Task>, StatusCode::Fail),
        (Box::new(SuccessNode) as Box<dyn Task>, StatusCode::Success),
        (Box::new(ContinueNode) as Box<dyn Task>, StatusCode::Active),
    ] {
        let mut d = Node::with_task("decorator", Repeat)
            .with_blackboard(&bb)
            .with_child(Node::with_boxed_task("child", child).with_blackboard(&bb))
            .unwrap();
        assert_eq!(d.tick().unwrap(), StatusCode::Active);
        assert_eq!(bb.get_node_status(d.id()), StatusCode::Active);
        assert_eq!(bb.get_node_status(child_id(&d)), code);
    }
}

#[test]
fn test_repeat_cancel() {
    let bb = Blackboard::new();
    let mut d = decorate(Repeat, ContinueNode, &bb);
    let child = child_id(&d);
    d.tick().unwrap();
    d.cancel().unwrap();
    assert_eq!(*d.result(), StatusCode::Cancel);
    assert_eq!(*d.children()[0].result(), StatusCode::Cancel);
    assert_eq!(bb.get_node_status(d.id()), StatusCode::Cancel);
    assert_eq!(bb.get_node_status(child), StatusCode::Cancel);

    assert_eq!(d.tick().unwrap(), StatusCode::Cancel);
    assert_eq!(*d.result(), StatusCode::Pending);
    assert_eq!(*d.children()[0].result(), StatusCode::Pending);
    assert_eq!(bb.get_node_status(d.id()), StatusCode::Cancel);
    assert_eq!(bb.get_node_status(child), StatusCode::Cancel);
}

#[test]
fn test_repeat_cancel_child() {
    let bb = Blackboard::new();
    let mut d = decorate(Repeat, ContinueNode, &bb);
    let child = child_id(&d);
    d.tick().unwrap();
    d.child_mut("child").unwrap().cancel().unwrap();
    assert_eq!(*d.result(), StatusCode::Active);
    assert_eq!(*d.children()[0].result(), StatusCode::Cancel);
    assert_eq!(bb.get_node_status(d.id()), StatusCode::Active);
    assert_eq!(bb.get_node_status(child), StatusCode::Cancel);

    // CANCEL is passed through, so the decorator completes as well
    assert_eq!(d.tick().unwrap(), StatusCode::Cancel);
    assert_eq!(*d.result(), StatusCode::Pending);
    assert_eq!(*d.children()[0].result(), StatusCode::Pending);
    assert_eq!(bb.get_node_status(d.id()), StatusCode::Cancel);
    assert_eq!(bb.get_node_status(child), StatusCode::Cancel);
}

#[test]
fn test_repeat_force() {
    let bb = Blackboard::new();
    let mut d = decorate(Repeat, SuccessNode, &bb);
    d.child_mut("child").unwrap().force(StatusCode::Fail);
    assert_eq!(d.tick().unwrap(), StatusCode::Active);
    assert_eq!(bb.get_node_status(child_id(&d)), StatusCode::Fail);

    let mut d = decorate(Repeat, FailNode, &bb);
    d.tick().unwrap();
    d.force(StatusCode::Success);
    assert_eq!(d.tick().unwrap(), StatusCode::Success);
    assert_eq!(bb.get_node_status(d.id()), StatusCode::Success);
    assert_eq!(bb.get_node_status(child_id(&d)), StatusCode::Fail);

    // Forcing completion while the child runs cancels the child
    let mut d = decorate(Repeat, ContinueNode, &bb);
    d.tick().unwrap();
    d.force(StatusCode::Fail);
    assert_eq!(d.tick().unwrap(), StatusCode::Fail);
    assert_eq!(bb.get_node_status(d.id()), StatusCode::Fail);
    assert_eq!(bb.get_node_status(child_id(&d)), StatusCode::Cancel);
}

#[test]
fn test_while() {
    let bb = Blackboard::new();
    let mut d = decorate(While, FailNode, &bb);
    assert_eq!(d.tick().unwrap(), StatusCode::Fail);

    let mut d = decorate(While, SuccessNode, &bb);
    let result = d.tick().unwrap();
    assert_eq!(result, StatusCode::Active);
    assert_eq!(result.text, "Continuing.. child");
    assert_eq!(d.tick().unwrap(), StatusCode::Active);

    let mut d = decorate(While, ContinueNode, &bb);
    assert_eq!(d.tick().unwrap(), StatusCode::Active);
    d.cancel().unwrap();
    assert_eq!(bb.get_node_status(child_id(&d)), StatusCode::Cancel);
    assert_eq!(d.tick().unwrap(), StatusCode::Cancel);
    assert_eq!(*d.children()[0].result(), StatusCode::Pending);
}

#[test]
fn test_while_force() {
    let bb = Blackboard::new();
    let mut d = decorate(While, SuccessNode, &bb);
    d.child_mut("child").unwrap().force(StatusCode::Fail);
    assert_eq!(d.tick().unwrap(), StatusCode::Fail);

    let mut d = decorate(While, SuccessNode, &bb);
    d.tick().unwrap();
    d.force(StatusCode::Success);
    assert_eq!(d.tick().unwrap(), StatusCode::Success);
}

#[test]
fn test_until() {
    let bb = Blackboard::new();
    let mut d = decorate(Until, FailNode, &bb);
    let result = d.tick().unwrap();
    assert_eq!(result, StatusCode::Active);
    assert_eq!(result.text, "Trying again.. child");

    let mut d = decorate(Until, SuccessNode, &bb);
    assert_eq!(d.tick().unwrap(), StatusCode::Success);

    let mut d = decorate(Until, ContinueNode, &bb);
    assert_eq!(d.tick().unwrap(), StatusCode::Active);
    d.child_mut("child").unwrap().cancel().unwrap();
    assert_eq!(d.tick().unwrap(), StatusCode::Cancel);
    assert_eq!(*d.result(), StatusCode::Pending);
}

#[test]
fn test_until_force() {
    let bb = Blackboard::new();
    let mut d = decorate(Until, FailNode, &bb);
    d.child_mut("child").unwrap().force(StatusCode::Success);
    assert_eq!(d.tick().unwrap(), StatusCode::Success);

    let mut d = decorate(Until, FailNode, &bb);
    d.tick().unwrap();
    d.force(StatusCode::Fail);
    assert_eq!(d.tick().unwrap(), StatusCode::Fail);
    assert_eq!(bb.get_node_status(child_id(&d)), StatusCode::Fail);
}

#[test]
fn test_until_count() {
    let bb = Blackboard::new();
    let mut d = decorate(UntilCount::new(3), FailNode, &bb);
    let result = d.tick().unwrap();
    assert_eq!(result, StatusCode::Active);
    assert_eq!(result.text, "Trying again 1 until 3..");
    assert_eq!(d.tick().unwrap(), StatusCode::Active);
    assert_eq!(d.tick().unwrap(), StatusCode::Fail);
    assert_eq!(d.nodedata().get::<i64>("count"), Ok(3));
    assert_eq!(*d.result(), StatusCode::Pending);

    // A new run starts counting from zero
    assert_eq!(d.tick().unwrap(), StatusCode::Active);
    assert_eq!(d.nodedata().get::<i64>("count"), Ok(1));
}

#[test]
fn test_until_count_from_memory() {
    let bb = Blackboard::new();
    let mut d = decorate(UntilCount::default(), FailNode, &bb);
    d.set_nodedata("max_count", 2i64);
    assert_eq!(d.tick().unwrap(), StatusCode::Active);
    assert_eq!(d.tick().unwrap(), StatusCode::Fail);

    let mut d = decorate(UntilCount::default(), FailNode, &bb);
    assert_eq!(d.tick().unwrap(), StatusCode::Fail);
    assert_eq!(d.nodedata().get::<i64>("max_count"), Ok(1));

    let mut d = decorate(UntilCount::new(5), SuccessNode, &bb);
    assert_eq!(d.tick().unwrap(), StatusCode::Success);
    assert_eq!(d.nodedata().get::<i64>("count"), Ok(0));
}

#[test]
fn test_fail() {
    let bb = Blackboard::new();
    let mut d = decorate(Fail, FailNode, &bb);
    assert_eq!(d.tick().unwrap(), StatusCode::Fail);

    let mut d = decorate(Fail, SuccessNode, &bb);
    let result = d.tick().unwrap();
    assert_eq!(result, StatusCode::Fail);
    assert_eq!(result.text, "Failing child");

    let mut d = decorate(Fail, ContinueNode, &bb);
    assert_eq!(d.tick().unwrap(), StatusCode::Active);
    d.cancel().unwrap();
    assert_eq!(*d.children()[0].result(), StatusCode::Cancel);
    assert_eq!(d.tick().unwrap(), StatusCode::Cancel);
    assert_eq!(*d.children()[0].result(), StatusCode::Pending);
}

#[test]
fn test_fail_force() {
    let bb = Blackboard::new();
    let mut d = decorate(Fail, FailNode, &bb);
    d.child_mut("child").unwrap().force(StatusCode::Success);
    assert_eq!(d.tick().unwrap(), StatusCode::Fail);

    let mut d = decorate(Fail, ContinueNode, &bb);
    d.tick().unwrap();
    d.force(StatusCode::Success);
    assert_eq!(d.tick().unwrap(), StatusCode::Success);
    assert_eq!(bb.get_node_status(child_id(&d)), StatusCode::Cancel);
}

#[test]
fn test_succeed() {
    let bb = Blackboard::new();
    let mut d = decorate(Succeed, FailNode, &bb);
    let result = d.tick().unwrap();
    assert_eq!(result, StatusCode::Success);
    assert_eq!(result.text, "Succeeding child");

    let mut d = decorate(Succeed, SuccessNode, &bb);
    assert_eq!(d.tick().unwrap(), StatusCode::Success);

    let mut d = decorate(Succeed, ContinueNode, &bb);
    assert_eq!(d.tick().unwrap(), StatusCode::Active);
    d.child_mut("child").unwrap().cancel().unwrap();
    assert_eq!(*d.result(), StatusCode::Active);
    assert_eq!(d.tick().unwrap(), StatusCode::Cancel);
}

#[test]
fn test_succeed_force() {
    let bb = Blackboard::new();
    let mut d = decorate(Succeed, SuccessNode, &bb);
    d.child_mut("child").unwrap().force(StatusCode::Fail);
    assert_eq!(d.tick().unwrap(), StatusCode::Success);

    let mut d = decorate(Succeed, ContinueNode, &bb);
    d.tick().unwrap();
    d.force(StatusCode::Fail);
    assert_eq!(d.tick().unwrap(), StatusCode::Fail);
    assert_eq!(bb.get_node_status(d.id()), StatusCode::Fail);
}
