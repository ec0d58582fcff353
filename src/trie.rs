/// A single node of a per-method path tree.
///
/// Only nodes that terminate a registered route carry a pattern; intermediate nodes exist to host
/// their descendants and never match on their own.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Node {
	pattern: String,
	part: String,
	children: Vec<Node>,
	is_wild: bool,
}

impl Node {
	fn with_part(part: &str) -> Self {
		Self {
			pattern: String::new(),
			part: part.to_owned(),
			children: Vec::new(),
			is_wild: part.starts_with(':') || part.starts_with('*'),
		}
	}

	/// The full route pattern terminating at this node, or `""` for intermediate nodes.
	pub fn pattern(&self) -> &str {
		&self.pattern
	}

	/// The literal or placeholder text of this segment.
	pub fn part(&self) -> &str {
		&self.part
	}

	pub fn is_wild(&self) -> bool {
		self.is_wild
	}

	pub fn children(&self) -> &[Node] {
		&self.children
	}

	// First child able to host `part` during insertion. A wild child hosts any literal.
	fn match_child(&self, part: &str) -> Option<usize> {
		self.children
			.iter()
			.position(|child| child.part == part || child.is_wild)
	}

	/// Registers that `parts[height..]` terminates at `pattern`.
	pub fn insert(&mut self, pattern: &str, parts: &[&str], height: usize) {
		let part = match parts.get(height) {
			Some(part) => *part,
			None => {
				self.pattern = pattern.to_owned();
				return;
			}
		};

		let index = match self.match_child(part) {
			Some(index) => index,
			None => {
				self.children.push(Node::with_part(part));
				self.children.len() - 1
			}
		};

		self.children[index].insert(pattern, parts, height + 1);
	}

	/// Finds the node matching `parts[height..]`.
	///
	/// A node whose part starts with `*` matches whatever remains of the path. Children are tried
	/// in insertion order and the first hit wins; literals get no precedence over placeholders.
	pub fn search(&self, parts: &[&str], height: usize) -> Option<&Node> {
		if height == parts.len() || self.part.starts_with('*') {
			return if self.pattern.is_empty() {
				None
			} else {
				Some(self)
			};
		}

		let part = parts[height];
		self.children
			.iter()
			.filter(|child| child.part == part || child.is_wild)
			.find_map(|child| child.search(parts, height + 1))
	}
}

#[cfg(test)]
mod test {
	use super::Node;
	use crate::route::parse_pattern;

	fn insert(root: &mut Node, pattern: &str) {
		root.insert(pattern, &parse_pattern(pattern), 0);
	}

	fn search<'a>(root: &'a Node, path: &str) -> Option<&'a str> {
		root.search(&parse_pattern(path), 0).map(Node::pattern)
	}

	fn count(node: &Node) -> usize {
		1 + node.children().iter().map(count).sum::<usize>()
	}

	#[test]
	fn builds_shared_branches() {
		let mut root = Node::default();
		insert(&mut root, "/users/:id");
		insert(&mut root, "/users/:id/posts");
		insert(&mut root, "/users");

		assert_eq!(root.children().len(), 1);
		let users = &root.children()[0];
		assert_eq!(users.part(), "users");
		assert_eq!(users.pattern(), "/users");
		assert!(!users.is_wild());

		let id = &users.children()[0];
		assert_eq!(id.part(), ":id");
		assert!(id.is_wild());
		assert_eq!(id.pattern(), "/users/:id");
		assert_eq!(id.children()[0].pattern(), "/users/:id/posts");
	}

	#[test]
	fn intermediate_nodes_do_not_match() {
		let mut root = Node::default();
		insert(&mut root, "/a/b/c");

		assert_eq!(search(&root, "/a/b/c"), Some("/a/b/c"));
		assert_eq!(search(&root, "/a/b"), None);
		assert_eq!(search(&root, "/a"), None);
		assert_eq!(search(&root, "/"), None);
	}

	#[test]
	fn catch_all_absorbs_remainder() {
		let mut root = Node::default();
		insert(&mut root, "/assets/*filepath");

		assert_eq!(search(&root, "/assets/a/b/c"), Some("/assets/*filepath"));
		assert_eq!(search(&root, "/assets/a"), Some("/assets/*filepath"));
		assert_eq!(search(&root, "/assets"), None);
	}

	#[test]
	fn first_inserted_child_wins() {
		let mut root = Node::default();
		insert(&mut root, "/hello");
		insert(&mut root, "/:name");

		assert_eq!(root.children().len(), 2);
		assert_eq!(search(&root, "/hello"), Some("/hello"));
		assert_eq!(search(&root, "/bob"), Some("/:name"));
	}

	#[test]
	fn wild_child_hosts_later_literal() {
		let mut root = Node::default();
		insert(&mut root, "/:name");
		insert(&mut root, "/hello");

		// the literal lands on the existing placeholder node and takes over its pattern
		assert_eq!(root.children().len(), 1);
		assert_eq!(search(&root, "/hello"), Some("/hello"));
		assert_eq!(search(&root, "/bob"), Some("/hello"));
	}

	#[test]
	fn reinsert_is_structural_noop() {
		let mut root = Node::default();
		insert(&mut root, "/hello/:name");
		let before = count(&root);
		insert(&mut root, "/hello/:name");

		assert_eq!(count(&root), before);
		assert_eq!(search(&root, "/hello/x"), Some("/hello/:name"));
	}

	#[test]
	fn backtracks_across_siblings() {
		let mut root = Node::default();
		insert(&mut root, "/a/x");
		insert(&mut root, "/:p/y");

		assert_eq!(search(&root, "/a/y"), Some("/:p/y"));
		assert_eq!(search(&root, "/a/x"), Some("/a/x"));
	}
}
